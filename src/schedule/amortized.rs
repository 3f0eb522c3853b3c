use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{LeaseError, Result};
use crate::schedule::{add_months, project_status, GeneratedSchedule, PaymentScheduleEntry};
use crate::types::{PaymentInterval, PaymentType};

/// Schedule generator for the fixed-amortized model.
///
/// Equal total payments throughout the term; the rent share shrinks and the
/// principal share grows as the balance declines. Amortized plans are always
/// generated on a monthly cadence.
#[derive(Debug, Clone)]
pub struct AmortizedScheduleGenerator {
    vehicle_price: Money,
    down_payment: Money,
    tenure_months: u32,
    annual_rate: Rate,
}

impl AmortizedScheduleGenerator {
    pub fn new(
        vehicle_price: Money,
        down_payment: Money,
        tenure_months: u32,
        annual_rate: Rate,
    ) -> Result<Self> {
        if !vehicle_price.is_positive() {
            return Err(LeaseError::InvalidVehiclePrice {
                price: vehicle_price,
            });
        }
        if down_payment.is_negative() {
            return Err(LeaseError::InvalidConfiguration {
                message: format!("negative down payment: {down_payment}"),
            });
        }
        if down_payment > vehicle_price {
            return Err(LeaseError::DownPaymentExceedsPrice {
                down_payment,
                price: vehicle_price,
            });
        }
        if tenure_months == 0 {
            return Err(LeaseError::InvalidTerm { months: 0 });
        }
        if annual_rate.as_decimal().is_sign_negative() {
            return Err(LeaseError::InvalidRentalRate {
                rate: annual_rate.as_decimal(),
            });
        }

        Ok(Self {
            vehicle_price,
            down_payment,
            tenure_months,
            annual_rate,
        })
    }

    /// fixed payment amount for the configured principal and term
    pub fn fixed_payment(&self) -> Money {
        emi_amount(
            self.vehicle_price - self.down_payment,
            self.annual_rate,
            self.tenure_months,
        )
    }

    pub fn generate(
        &self,
        start_date: NaiveDate,
        time: &SafeTimeProvider,
    ) -> GeneratedSchedule {
        let today = time.now().date_naive();
        let monthly_rate = self.annual_rate.monthly_rate();
        let emi = self.fixed_payment();

        let mut entries = Vec::with_capacity(self.tenure_months as usize + 1);

        if self.down_payment.is_positive() {
            entries.push(PaymentScheduleEntry {
                period: 0,
                due_date: start_date,
                amount: self.down_payment,
                principal: self.down_payment,
                rent: Money::ZERO,
                payment_type: PaymentType::DownPayment,
                is_balloon: false,
                projected_status: project_status(start_date, today, &PaymentInterval::Monthly),
                actual_status: None,
                paid_amount: None,
                remaining_amount: None,
                paid_date: None,
            });
        }

        let mut balance = self.vehicle_price - self.down_payment;

        for period in 1..=self.tenure_months {
            let due_date = add_months(start_date, period);
            let rent = monthly_rate.rent_on(balance);
            let principal = emi - rent;
            balance = (balance - principal).max(Money::ZERO);

            entries.push(PaymentScheduleEntry {
                period,
                due_date,
                amount: emi,
                principal,
                rent,
                payment_type: PaymentType::Installment,
                is_balloon: false,
                projected_status: project_status(due_date, today, &PaymentInterval::Monthly),
                actual_status: None,
                paid_amount: None,
                remaining_amount: None,
                paid_date: None,
            });
        }

        // fold any sub-unit residue into the final payment
        if balance.is_positive() && balance < Money::from_major(1) {
            if let Some(last) = entries.last_mut() {
                last.principal += balance;
                last.amount += balance;
            }
        }

        let schedule = GeneratedSchedule::from_entries(entries);
        debug!(
            term = self.tenure_months,
            emi = %emi,
            total = %schedule.total_amount,
            "generated amortized schedule"
        );
        schedule
    }
}

/// fixed payment: P * r * (1 + r)^n / ((1 + r)^n - 1)
fn emi_amount(principal: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate.monthly_rate().as_decimal();
    if monthly_rate.is_zero() {
        return principal / Decimal::from(months);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + monthly_rate;
    for _ in 0..months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * monthly_rate * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
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

    fn generator() -> AmortizedScheduleGenerator {
        AmortizedScheduleGenerator::new(
            Money::from_major(50_000),
            Money::from_major(10_000),
            12,
            Rate::from_decimal(dec!(0.12)),
        )
        .unwrap()
    }

    #[test]
    fn test_equal_payments_throughout() {
        let schedule = generator().generate(start(), &frozen());

        assert_eq!(schedule.entries.len(), 13);

        // 40,000 at 1%/month over 12 months
        let emi = schedule.entries[1].amount;
        assert_eq!(emi.to_cents(), Money::from_str_exact("3553.95").unwrap());

        for entry in &schedule.entries[1..12] {
            assert_eq!(entry.amount, emi);
        }
    }

    #[test]
    fn test_rent_shrinks_principal_grows() {
        let schedule = generator().generate(start(), &frozen());
        let installments = &schedule.entries[1..];

        assert_eq!(installments[0].rent, Money::from_major(400));
        for pair in installments.windows(2) {
            assert!(pair[1].rent < pair[0].rent);
            assert!(pair[1].principal > pair[0].principal);
        }
    }

    #[test]
    fn test_principal_reconstructs_price() {
        let schedule = generator().generate(start(), &frozen());

        let principal: Money = schedule.entries.iter().map(|e| e.principal).sum();
        let drift = (principal - Money::from_major(50_000)).abs();
        assert!(drift.as_decimal() <= MONEY_TOLERANCE);

        let summed: Money = schedule.entries.iter().map(|e| e.amount).sum();
        assert_eq!(summed, schedule.total_amount);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let schedule = AmortizedScheduleGenerator::new(
            Money::from_major(12_000),
            Money::ZERO,
            12,
            Rate::ZERO,
        )
        .unwrap()
        .generate(start(), &frozen());

        for entry in &schedule.entries {
            assert_eq!(entry.amount, Money::from_major(1_000));
            assert_eq!(entry.rent, Money::ZERO);
        }
        assert_eq!(schedule.total_amount, Money::from_major(12_000));
    }
}
