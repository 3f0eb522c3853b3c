use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{LeaseError, Result};
use crate::schedule::{
    add_periods, project_status, GeneratedSchedule, PaymentScheduleEntry, DAYS_PER_TENURE_MONTH,
};
use crate::types::{PaymentInterval, PaymentStructure, PaymentType};

/// Schedule generator for the balloon-payment model.
///
/// The vehicle price is split into down payment, amortized installment
/// tranche, and a final balloon tranche. Rent in every installment period is
/// charged on the full outstanding balance INCLUDING the as-yet-unpaid
/// balloon, which is what separates this model from plain dynamic rent.
#[derive(Debug, Clone)]
pub struct BalloonScheduleGenerator {
    vehicle_price: Money,
    structure: PaymentStructure,
    term_months: u32,
    annual_rate: Rate,
    interval: PaymentInterval,
}

impl BalloonScheduleGenerator {
    pub fn new(
        vehicle_price: Money,
        structure: PaymentStructure,
        term_months: u32,
        annual_rate: Rate,
        interval: PaymentInterval,
    ) -> Result<Self> {
        structure.validate()?;

        if !vehicle_price.is_positive() {
            return Err(LeaseError::InvalidVehiclePrice {
                price: vehicle_price,
            });
        }
        if term_months == 0 {
            return Err(LeaseError::InvalidTerm { months: 0 });
        }
        if annual_rate.as_decimal().is_sign_negative() {
            return Err(LeaseError::InvalidRentalRate {
                rate: annual_rate.as_decimal(),
            });
        }

        Ok(Self {
            vehicle_price,
            structure,
            term_months,
            annual_rate,
            interval,
        })
    }

    pub fn down_payment_amount(&self) -> Money {
        self.vehicle_price
            .percentage(self.structure.down_payment_percent)
    }

    pub fn balloon_amount(&self) -> Money {
        self.vehicle_price.percentage(self.structure.balloon_percent)
    }

    fn periods(&self) -> u32 {
        if self.interval.is_daily() {
            self.term_months * DAYS_PER_TENURE_MONTH
        } else {
            self.term_months
        }
    }

    pub fn generate(
        &self,
        start_date: NaiveDate,
        time: &SafeTimeProvider,
    ) -> GeneratedSchedule {
        let today = time.now().date_naive();
        let periods = self.periods();
        let period_rate = self.annual_rate.periodic(self.interval.periods_per_year());

        let down_payment = self.down_payment_amount();
        let balloon = self.balloon_amount();
        let total_installment = self
            .vehicle_price
            .percentage(self.structure.installment_percent);
        let principal_share = total_installment / Decimal::from(periods);

        let mut entries = Vec::with_capacity(periods as usize + 2);

        if down_payment.is_positive() {
            entries.push(PaymentScheduleEntry {
                period: 0,
                due_date: start_date,
                amount: down_payment,
                principal: down_payment,
                rent: Money::ZERO,
                payment_type: PaymentType::DownPayment,
                is_balloon: false,
                projected_status: project_status(start_date, today, &self.interval),
                actual_status: None,
                paid_amount: None,
                remaining_amount: None,
                paid_date: None,
            });
        }

        // everything not yet paid, balloon tranche included
        let mut outstanding = self.vehicle_price - down_payment;

        for period in 1..=periods {
            let due_date = add_periods(start_date, period, &self.interval);
            let rent = period_rate.rent_on(outstanding);

            entries.push(PaymentScheduleEntry {
                period,
                due_date,
                amount: principal_share + rent,
                principal: principal_share,
                rent,
                payment_type: PaymentType::Installment,
                is_balloon: false,
                projected_status: project_status(due_date, today, &self.interval),
                actual_status: None,
                paid_amount: None,
                remaining_amount: None,
                paid_date: None,
            });

            outstanding = (outstanding - principal_share).max(Money::ZERO);
        }

        // balloon falls due one period after the last installment
        let balloon_due = add_periods(start_date, periods + 1, &self.interval);
        let balloon_rent = period_rate.rent_on(balloon);
        entries.push(PaymentScheduleEntry {
            period: periods + 1,
            due_date: balloon_due,
            amount: balloon + balloon_rent,
            principal: balloon,
            rent: balloon_rent,
            payment_type: PaymentType::BalloonPayment,
            is_balloon: true,
            projected_status: project_status(balloon_due, today, &self.interval),
            actual_status: None,
            paid_amount: None,
            remaining_amount: None,
            paid_date: None,
        });

        let schedule = GeneratedSchedule::from_entries(entries);
        debug!(
            periods,
            balloon = %balloon,
            total = %schedule.total_amount,
            rent = %schedule.total_rent,
            "generated balloon schedule"
        );
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use crate::types::MONEY_TOLERANCE;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn frozen() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn generator() -> BalloonScheduleGenerator {
        BalloonScheduleGenerator::new(
            Money::from_major(50_000),
            PaymentStructure::new(dec!(20), dec!(60), dec!(20)),
            12,
            Rate::from_decimal(dec!(0.12)),
            PaymentInterval::Monthly,
        )
        .unwrap()
    }

    #[test]
    fn test_structure_must_sum_to_hundred() {
        let result = BalloonScheduleGenerator::new(
            Money::from_major(50_000),
            PaymentStructure::new(dec!(20), dec!(70), dec!(5)),
            12,
            Rate::from_decimal(dec!(0.12)),
            PaymentInterval::Monthly,
        );
        assert!(matches!(result, Err(LeaseError::PaymentStructureSum { .. })));
    }

    #[test]
    fn test_schedule_shape_and_amounts() {
        let schedule = generator().generate(start(), &frozen());

        // down payment + 12 installments + balloon
        assert_eq!(schedule.entries.len(), 14);
        assert_eq!(schedule.entries[0].amount, Money::from_major(10_000));

        // 30,000 installment tranche over 12 periods
        let first = &schedule.entries[1];
        assert_eq!(first.principal, Money::from_major(2_500));
        // rent on the full 40,000 outstanding, balloon included
        assert_eq!(first.rent, Money::from_major(400));

        // final installment still pays rent on the unpaid balloon:
        // outstanding = 40,000 - 2,500 x 11 = 12,500 at 1%/month
        let last_installment = &schedule.entries[12];
        assert_eq!(last_installment.rent, Money::from_major(125));

        // balloon: 10,000 tranche + one period of rent on itself
        let balloon = &schedule.entries[13];
        assert!(balloon.is_balloon);
        assert_eq!(balloon.payment_type, PaymentType::BalloonPayment);
        assert_eq!(balloon.amount, Money::from_major(10_100));
        assert_eq!(balloon.due_date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn test_total_is_price_plus_rent() {
        let schedule = generator().generate(start(), &frozen());

        // rent: 1% of 40,000 + 37,500 + ... + 12,500, plus 100 on the balloon
        assert_eq!(schedule.total_rent, Money::from_major(3_250));
        assert_eq!(schedule.total_amount, Money::from_major(53_250));

        let summed: Money = schedule.entries.iter().map(|e| e.amount).sum();
        let drift = (summed - schedule.total_amount).abs();
        assert!(drift.as_decimal() <= MONEY_TOLERANCE);
    }

    #[test]
    fn test_zero_down_structure_has_no_down_entry() {
        let schedule = BalloonScheduleGenerator::new(
            Money::from_major(50_000),
            PaymentStructure::new(dec!(0), dec!(80), dec!(20)),
            12,
            Rate::from_decimal(dec!(0.12)),
            PaymentInterval::Monthly,
        )
        .unwrap()
        .generate(start(), &frozen());

        assert_eq!(schedule.entries.len(), 13);
        assert_eq!(schedule.entries[0].payment_type, PaymentType::Installment);
        // rent in period one covers the whole price
        assert_eq!(schedule.entries[0].rent, Money::from_major(500));
    }

    #[test]
    fn test_daily_balloon_schedule() {
        let schedule = BalloonScheduleGenerator::new(
            Money::from_major(50_000),
            PaymentStructure::new(dec!(20), dec!(60), dec!(20)),
            1,
            Rate::from_decimal(dec!(0.12)),
            PaymentInterval::Daily,
        )
        .unwrap()
        .generate(start(), &frozen());

        // down + 30 daily installments + balloon
        assert_eq!(schedule.entries.len(), 32);
        let first = &schedule.entries[1];
        assert_eq!(first.principal, Money::from_major(1_000));
        // 40,000 x 0.12 / 365
        assert_eq!(first.rent.to_cents(), Money::from_str_exact("13.15").unwrap());
    }
}
