pub mod timeline;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::PaymentStructure;

pub use timeline::{
    Milestone, MilestoneLabel, OwnershipTimeline, OwnershipTimelineBuilder, TimelinePoint,
};

/// customer/company split of the vehicle's economic interest at a point in
/// the schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnershipSplit {
    pub customer: Money,
    pub company: Money,
}

impl OwnershipSplit {
    /// customer share as a percentage of the vehicle price
    pub fn customer_percentage(&self, vehicle_price: Money) -> Decimal {
        self.customer.percent_of(vehicle_price)
    }
}

/// Fractional ownership under the dynamic-rent model.
///
/// Each paid installment moves one principal share of the loan from the
/// company to the customer; the split is a pure function of the payment
/// index.
#[derive(Debug, Clone, Copy)]
pub struct OwnershipCalculator {
    vehicle_price: Money,
    down_payment: Money,
    tenure_months: u32,
}

impl OwnershipCalculator {
    pub fn new(vehicle_price: Money, down_payment: Money, tenure_months: u32) -> Self {
        Self {
            vehicle_price,
            down_payment,
            tenure_months,
        }
    }

    /// financed amount after the down payment
    pub fn loan_amount(&self) -> Money {
        (self.vehicle_price - self.down_payment).max(Money::ZERO)
    }

    /// constant principal share per payment period; zero for a zero tenure
    pub fn principal_per_period(&self) -> Money {
        if self.tenure_months == 0 {
            return Money::ZERO;
        }
        self.loan_amount() / Decimal::from(self.tenure_months)
    }

    /// split after payment `payment_index` (0-based) has been made
    pub fn at_index(&self, payment_index: u32) -> OwnershipSplit {
        let paid_principal =
            self.principal_per_period() * Decimal::from(payment_index + 1);
        let customer = (self.down_payment + paid_principal).min(self.vehicle_price);
        let company = (self.vehicle_price - customer).max(Money::ZERO);

        OwnershipSplit { customer, company }
    }

    /// company stake at the opening of period `payment_index`, before that
    /// period's payment; this is the base rent is charged on
    pub fn company_at_period_start(&self, payment_index: u32) -> Money {
        let paid_principal = self.principal_per_period() * Decimal::from(payment_index);
        let customer = (self.down_payment + paid_principal).min(self.vehicle_price);
        (self.vehicle_price - customer).max(Money::ZERO)
    }

    /// Split under the balloon model after payment `payment_index`.
    ///
    /// Only the installment tranche accrues ownership; the balloon tranche
    /// is all-or-nothing and never accrues partially. Ownership stays capped
    /// below 100% until `balloon_paid`.
    pub fn balloon_at_index(
        &self,
        structure: &PaymentStructure,
        payment_index: u32,
        balloon_paid: bool,
    ) -> OwnershipSplit {
        if balloon_paid {
            return OwnershipSplit {
                customer: self.vehicle_price,
                company: Money::ZERO,
            };
        }

        let max_without_balloon = self
            .vehicle_price
            .percentage(Decimal::from(100) - structure.balloon_percent);

        let total_installment = self.vehicle_price.percentage(structure.installment_percent);
        let principal_per_period = if self.tenure_months == 0 {
            Money::ZERO
        } else {
            total_installment / Decimal::from(self.tenure_months)
        };

        let paid_principal = principal_per_period * Decimal::from(payment_index + 1);
        let customer = (self.down_payment + paid_principal).min(max_without_balloon);
        let company = (self.vehicle_price - customer).max(Money::ZERO);

        OwnershipSplit { customer, company }
    }
}
