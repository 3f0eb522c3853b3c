use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LeaseError, Result};

/// unique identifier for an installment plan
pub type PlanId = Uuid;

/// how a plan's schedule was produced and how its first-period amount reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// fixed principal share, rent on the company's remaining stake
    DynamicRent,
    /// equal total payments throughout the term
    AmortizedFixed,
    /// down payment + installments + final balloon tranche
    BalloonPayment,
}

/// payment cadence for a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentInterval {
    Monthly,
    Daily,
    /// unrecognized cadence, calculated as monthly but preserved verbatim
    Other(String),
}

impl PaymentInterval {
    /// parse a caller-supplied interval string
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "monthly" => PaymentInterval::Monthly,
            "daily" => PaymentInterval::Daily,
            _ => PaymentInterval::Other(raw.to_string()),
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, PaymentInterval::Daily)
    }

    /// payment periods per year for rent computation
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentInterval::Daily => 365,
            PaymentInterval::Monthly | PaymentInterval::Other(_) => 12,
        }
    }
}

/// what a schedule entry is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    DownPayment,
    Installment,
    BalloonPayment,
}

/// status projected at generation time from due date vs the injected clock.
///
/// A presentation default only: past entries are projected as paid even
/// though no payment has occurred. Live payment truth arrives later as an
/// [`ActualStatus`] overlay from the owning application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedStatus {
    Paid,
    Active,
    Upcoming,
}

impl ProjectedStatus {
    pub fn as_actual(self) -> ActualStatus {
        match self {
            ProjectedStatus::Paid => ActualStatus::Paid,
            ProjectedStatus::Active => ActualStatus::Active,
            ProjectedStatus::Upcoming => ActualStatus::Upcoming,
        }
    }
}

/// live payment status applied by the owning application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActualStatus {
    Due,
    Active,
    Paid,
    Unpaid,
    PartiallyPaid,
    Upcoming,
}

impl ActualStatus {
    /// severity for worst-status aggregation: unpaid > partially_paid >
    /// due > active > upcoming; paid carries no severity
    pub fn severity(self) -> u8 {
        match self {
            ActualStatus::Unpaid => 5,
            ActualStatus::PartiallyPaid => 4,
            ActualStatus::Due => 3,
            ActualStatus::Active => 2,
            ActualStatus::Upcoming => 1,
            ActualStatus::Paid => 0,
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, ActualStatus::Paid)
    }
}

/// tolerance for percentage-sum and schedule-sum checks
pub const MONEY_TOLERANCE: Decimal = dec!(0.01);

/// balloon plan split of the vehicle price across the three tranches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentStructure {
    pub down_payment_percent: Decimal,
    pub installment_percent: Decimal,
    pub balloon_percent: Decimal,
}

impl PaymentStructure {
    pub fn new(
        down_payment_percent: Decimal,
        installment_percent: Decimal,
        balloon_percent: Decimal,
    ) -> Self {
        Self {
            down_payment_percent,
            installment_percent,
            balloon_percent,
        }
    }

    /// admin-entered input, rejected loudly rather than defaulted
    pub fn validate(&self) -> Result<()> {
        for (component, value) in [
            ("down_payment", self.down_payment_percent),
            ("installment", self.installment_percent),
            ("balloon", self.balloon_percent),
        ] {
            if value.is_sign_negative() {
                return Err(LeaseError::NegativePercentage { component, value });
            }
        }

        let sum = self.down_payment_percent + self.installment_percent + self.balloon_percent;
        if (sum - dec!(100)).abs() > MONEY_TOLERANCE {
            return Err(LeaseError::PaymentStructureSum { sum });
        }

        Ok(())
    }
}
