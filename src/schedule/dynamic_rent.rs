use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{LeaseError, Result};
use crate::schedule::{
    add_periods, project_status, GeneratedSchedule, PaymentScheduleEntry, DAYS_PER_TENURE_MONTH,
};
use crate::types::{PaymentInterval, PaymentType};

/// Schedule generator for the dynamic-rent model.
///
/// Every period pays a fixed principal share plus rent charged on the
/// company's stake at the opening of that period, so the rent component
/// strictly decreases as the customer buys the vehicle down.
#[derive(Debug, Clone)]
pub struct PaymentScheduleGenerator {
    vehicle_price: Money,
    down_payment: Money,
    tenure_months: u32,
    annual_rate: Rate,
    interval: PaymentInterval,
}

impl PaymentScheduleGenerator {
    pub fn new(
        vehicle_price: Money,
        down_payment: Money,
        tenure_months: u32,
        annual_rate: Rate,
        interval: PaymentInterval,
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
        if annual_rate.as_decimal().is_sign_negative() {
            return Err(LeaseError::InvalidRentalRate {
                rate: annual_rate.as_decimal(),
            });
        }
        if tenure_months == 0 {
            return Err(LeaseError::InvalidTerm { months: 0 });
        }

        Ok(Self {
            vehicle_price,
            down_payment,
            tenure_months,
            annual_rate,
            interval,
        })
    }

    /// number of payment periods for the configured interval
    fn periods(&self) -> u32 {
        if self.interval.is_daily() {
            self.tenure_months * DAYS_PER_TENURE_MONTH
        } else {
            self.tenure_months
        }
    }

    pub fn generate(
        &self,
        start_date: NaiveDate,
        time: &SafeTimeProvider,
    ) -> GeneratedSchedule {
        let today = time.now().date_naive();
        let periods = self.periods();
        let loan_amount = self.vehicle_price - self.down_payment;
        let principal_share = loan_amount / Decimal::from(periods);
        let period_rate = self.annual_rate.periodic(self.interval.periods_per_year());

        let mut entries = Vec::with_capacity(periods as usize + 1);

        if self.down_payment.is_positive() {
            entries.push(PaymentScheduleEntry {
                period: 0,
                due_date: start_date,
                amount: self.down_payment,
                principal: self.down_payment,
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

        // company stake at the opening of the first period
        let mut company_stake = loan_amount;

        for period in 1..=periods {
            let due_date = add_periods(start_date, period, &self.interval);
            let rent = period_rate.rent_on(company_stake);

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

            company_stake = (company_stake - principal_share).max(Money::ZERO);
        }

        let schedule = GeneratedSchedule::from_entries(entries);
        debug!(
            periods,
            total = %schedule.total_amount,
            rent = %schedule.total_rent,
            "generated dynamic-rent schedule"
        );
        schedule
    }
}
