use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::ownership::OwnershipCalculator;
use crate::schedule::{
    AmortizedScheduleGenerator, BalloonScheduleGenerator, PaymentScheduleEntry,
    PaymentScheduleGenerator,
};
use crate::tenure::parse_tenure;
use crate::types::{CalculationMethod, PaymentInterval, PaymentStructure, PlanId};

/// Immutable result of schedule generation.
///
/// Callers persist a copy; nothing here is mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: PlanId,
    /// source tenure string, kept for display only
    pub tenure: String,
    pub tenure_months: u32,
    pub interval: PaymentInterval,
    /// first-period payment; reads per the calculation method (first
    /// decreasing-rent payment, fixed amortized payment, or fixed balloon
    /// installment)
    pub monthly_amount: Money,
    /// sum of every schedule entry, down payment and balloon included
    pub total_amount: Money,
    pub total_rent: Money,
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub schedule: Vec<PaymentScheduleEntry>,
    pub annual_rental_rate: Rate,
    pub calculation_method: CalculationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balloon_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_structure: Option<PaymentStructure>,
    pub start_date: NaiveDate,
    pub created_at: NaiveDate,
}

impl InstallmentPlan {
    /// entries not yet effectively paid, in schedule order
    pub fn remaining_entries(&self) -> Vec<PaymentScheduleEntry> {
        self.schedule.iter().filter(|e| !e.is_paid()).cloned().collect()
    }

    /// ownership calculator configured for this plan
    pub fn ownership_calculator(&self) -> OwnershipCalculator {
        OwnershipCalculator::new(self.vehicle_price, self.down_payment, self.tenure_months)
    }
}

/// Caller-facing input bundle for plan construction; the single entry point
/// the surrounding application uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub tenure: String,
    pub interval: String,
    pub annual_rental_rate: Rate,
    pub start_date: NaiveDate,
    pub calculation_method: CalculationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_structure: Option<PaymentStructure>,
}

impl PlanRequest {
    /// dynamic decreasing-rent plan
    pub fn dynamic_rent(
        vehicle_price: Money,
        down_payment: Money,
        tenure: &str,
        annual_rental_rate: Rate,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            vehicle_price,
            down_payment,
            tenure: tenure.to_string(),
            interval: "monthly".to_string(),
            annual_rental_rate,
            start_date,
            calculation_method: CalculationMethod::DynamicRent,
            payment_structure: None,
        }
    }

    /// fixed amortized plan
    pub fn amortized(
        vehicle_price: Money,
        down_payment: Money,
        tenure: &str,
        annual_rental_rate: Rate,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            calculation_method: CalculationMethod::AmortizedFixed,
            ..Self::dynamic_rent(vehicle_price, down_payment, tenure, annual_rental_rate, start_date)
        }
    }

    /// balloon plan; the down payment derives from the structure
    pub fn balloon(
        vehicle_price: Money,
        structure: PaymentStructure,
        tenure: &str,
        annual_rental_rate: Rate,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            vehicle_price,
            down_payment: vehicle_price.percentage(structure.down_payment_percent),
            tenure: tenure.to_string(),
            interval: "monthly".to_string(),
            annual_rental_rate,
            start_date,
            calculation_method: CalculationMethod::BalloonPayment,
            payment_structure: Some(structure),
        }
    }

    /// override the payment cadence ("monthly", "daily", preserved verbatim
    /// otherwise)
    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = interval.to_string();
        self
    }

    /// Generate the schedule and assemble the immutable plan.
    ///
    /// Configuration problems surface as structured errors before anything
    /// is generated; the injected clock drives status projection.
    pub fn build(&self, time: &SafeTimeProvider) -> Result<InstallmentPlan> {
        let tenure_months = parse_tenure(&self.tenure);
        let interval = PaymentInterval::parse(&self.interval);

        let (generated, balloon_payment) = match self.calculation_method {
            CalculationMethod::DynamicRent => {
                let generator = PaymentScheduleGenerator::new(
                    self.vehicle_price,
                    self.down_payment,
                    tenure_months,
                    self.annual_rental_rate,
                    interval.clone(),
                )?;
                (generator.generate(self.start_date, time), None)
            }
            CalculationMethod::AmortizedFixed => {
                let generator = AmortizedScheduleGenerator::new(
                    self.vehicle_price,
                    self.down_payment,
                    tenure_months,
                    self.annual_rental_rate,
                )?;
                (generator.generate(self.start_date, time), None)
            }
            CalculationMethod::BalloonPayment => {
                let structure = self.payment_structure.ok_or_else(|| {
                    crate::errors::LeaseError::InvalidConfiguration {
                        message: "balloon plan requires a payment structure".to_string(),
                    }
                })?;
                let generator = BalloonScheduleGenerator::new(
                    self.vehicle_price,
                    structure,
                    tenure_months,
                    self.annual_rental_rate,
                    interval.clone(),
                )?;
                let balloon = generator.balloon_amount();
                (generator.generate(self.start_date, time), Some(balloon))
            }
        };

        Ok(InstallmentPlan {
            id: Uuid::new_v4(),
            tenure: self.tenure.clone(),
            tenure_months,
            interval,
            monthly_amount: generated.first_payment_amount,
            total_amount: generated.total_amount,
            total_rent: generated.total_rent,
            vehicle_price: self.vehicle_price,
            down_payment: self.down_payment,
            schedule: generated.entries,
            annual_rental_rate: self.annual_rental_rate,
            calculation_method: self.calculation_method,
            balloon_payment,
            payment_structure: self.payment_structure,
            start_date: self.start_date,
            created_at: time.now().date_naive(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn frozen() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_end_to_end_dynamic_plan() {
        let plan = PlanRequest::dynamic_rent(
            Money::from_major(50_000),
            Money::from_major(10_000),
            "12 Months",
            Rate::from_decimal(dec!(0.12)),
            start(),
        )
        .build(&frozen())
        .unwrap();

        assert_eq!(plan.tenure_months, 12);
        assert_eq!(plan.schedule.len(), 13);
        assert_eq!(plan.monthly_amount.to_cents(), Money::from_str_exact("3733.33").unwrap());
        assert_eq!(plan.calculation_method, CalculationMethod::DynamicRent);
        assert!(plan.balloon_payment.is_none());

        // ownership after the first installment
        let split = plan.ownership_calculator().at_index(0);
        assert_eq!(split.customer.to_cents(), Money::from_str_exact("13333.33").unwrap());
        assert_eq!(
            split.customer_percentage(plan.vehicle_price).round_dp(2),
            dec!(26.67)
        );
    }

    #[test]
    fn test_balloon_plan_carries_structure() {
        let plan = PlanRequest::balloon(
            Money::from_major(50_000),
            PaymentStructure::new(dec!(20), dec!(60), dec!(20)),
            "1 Year",
            Rate::from_decimal(dec!(0.12)),
            start(),
        )
        .build(&frozen())
        .unwrap();

        assert_eq!(plan.down_payment, Money::from_major(10_000));
        assert_eq!(plan.balloon_payment, Some(Money::from_major(10_000)));
        assert_eq!(plan.schedule.len(), 14);
        assert_eq!(plan.total_amount, Money::from_major(53_250));
    }

    #[test]
    fn test_balloon_without_structure_fails_loudly() {
        let mut request = PlanRequest::dynamic_rent(
            Money::from_major(50_000),
            Money::ZERO,
            "12 Months",
            Rate::from_decimal(dec!(0.12)),
            start(),
        );
        request.calculation_method = CalculationMethod::BalloonPayment;

        assert!(request.build(&frozen()).is_err());
    }

    #[test]
    fn test_unknown_interval_preserved_verbatim() {
        let plan = PlanRequest::dynamic_rent(
            Money::from_major(24_000),
            Money::ZERO,
            "2 Years",
            Rate::from_decimal(dec!(0.10)),
            start(),
        )
        .with_interval("Fortnightly")
        .build(&frozen())
        .unwrap();

        // calculated as monthly, displayed as given
        assert_eq!(plan.interval, PaymentInterval::Other("Fortnightly".to_string()));
        assert_eq!(plan.schedule.len(), 24);
    }

    #[test]
    fn test_plan_serde_round_trip() {
        let plan = PlanRequest::dynamic_rent(
            Money::from_major(30_000),
            Money::from_major(5_000),
            "3 Years",
            Rate::from_decimal(dec!(0.15)),
            start(),
        )
        .build(&frozen())
        .unwrap();

        let json = serde_json::to_string(&plan).unwrap();
        let restored: InstallmentPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, plan);
    }
}
