pub mod discount;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LeaseError, Result};
use crate::types::PlanId;

pub use discount::SettlementDiscountCalculator;

/// how a discount value reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// value is a percentage of the component amount
    Percentage,
    /// value is a fixed currency amount
    Fixed,
}

/// one "months early" range mapped to principal/interest discounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredDiscount {
    pub min_months_early: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_months_early: Option<Decimal>,
    pub principal_discount: Decimal,
    pub interest_discount: Decimal,
    pub principal_discount_type: DiscountType,
    pub interest_discount_type: DiscountType,
}

impl TieredDiscount {
    pub fn matches(&self, months_early: Decimal) -> bool {
        months_early >= self.min_months_early
            && self
                .max_months_early
                .map(|max| months_early <= max)
                .unwrap_or(true)
    }

    /// whether two tier ranges intersect
    fn overlaps(&self, other: &TieredDiscount) -> bool {
        let self_end = self.max_months_early.unwrap_or(Decimal::MAX);
        let other_end = other.max_months_early.unwrap_or(Decimal::MAX);
        self.min_months_early <= other_end && other.min_months_early <= self_end
    }
}

/// admin-configured early-settlement discount policy; read-only to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementDiscountSettings {
    pub is_active: bool,

    // flat rule, used when no tier matches
    pub principal_discount_enabled: bool,
    pub principal_discount_type: DiscountType,
    pub principal_discount_value: Decimal,
    pub principal_discount_min_amount: Money,
    pub interest_discount_enabled: bool,
    pub interest_discount_type: DiscountType,
    pub interest_discount_value: Decimal,
    pub interest_discount_min_amount: Money,

    /// scanned in list order; the FIRST matching tier wins, even when admins
    /// configure overlapping ranges
    #[serde(default)]
    pub tiered_discounts: Vec<TieredDiscount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_percentage: Option<Decimal>,

    pub min_settlement_amount: Money,
    pub min_remaining_payments: usize,
}

impl Default for SettlementDiscountSettings {
    fn default() -> Self {
        Self {
            is_active: true,
            principal_discount_enabled: false,
            principal_discount_type: DiscountType::Percentage,
            principal_discount_value: Decimal::ZERO,
            principal_discount_min_amount: Money::ZERO,
            interest_discount_enabled: false,
            interest_discount_type: DiscountType::Percentage,
            interest_discount_value: Decimal::ZERO,
            interest_discount_min_amount: Money::ZERO,
            tiered_discounts: Vec::new(),
            max_discount_amount: None,
            max_discount_percentage: None,
            min_settlement_amount: Money::ZERO,
            min_remaining_payments: 0,
        }
    }
}

impl SettlementDiscountSettings {
    /// reject malformed admin input before any quoting
    pub fn validate(&self) -> Result<()> {
        if self.principal_discount_value.is_sign_negative()
            || self.interest_discount_value.is_sign_negative()
        {
            return Err(LeaseError::InvalidDiscountSettings {
                message: "discount values must not be negative".to_string(),
            });
        }
        if self.min_settlement_amount.is_negative() {
            return Err(LeaseError::InvalidDiscountSettings {
                message: "minimum settlement amount must not be negative".to_string(),
            });
        }
        if let Some(pct) = self.max_discount_percentage {
            if pct.is_sign_negative() {
                return Err(LeaseError::InvalidDiscountSettings {
                    message: "maximum discount percentage must not be negative".to_string(),
                });
            }
        }
        for (index, tier) in self.tiered_discounts.iter().enumerate() {
            if tier.principal_discount.is_sign_negative()
                || tier.interest_discount.is_sign_negative()
            {
                return Err(LeaseError::InvalidDiscountSettings {
                    message: format!("tier {index} has a negative discount value"),
                });
            }
            if let Some(max) = tier.max_months_early {
                if max < tier.min_months_early {
                    return Err(LeaseError::InvalidDiscountSettings {
                        message: format!("tier {index} has max months early below its minimum"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Overlapping tier ranges are legal but ambiguous: resolution is
    /// first-match by list order, which may not be what the admin intended.
    /// Surfaced as warnings for the configuring admin, never an error.
    pub fn overlap_warnings(&self) -> Vec<TierOverlapWarning> {
        let mut warnings = Vec::new();
        for i in 0..self.tiered_discounts.len() {
            for j in (i + 1)..self.tiered_discounts.len() {
                if self.tiered_discounts[i].overlaps(&self.tiered_discounts[j]) {
                    warnings.push(TierOverlapWarning { first: i, second: j });
                }
            }
        }
        warnings
    }
}

/// a pair of tier indices whose ranges intersect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierOverlapWarning {
    pub first: usize,
    pub second: usize,
}

/// why a settlement did or did not qualify for a discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementEligibility {
    Eligible,
    /// less than one month ahead of schedule
    SettlementTooLate,
    BelowMinimumAmount,
    TooFewRemainingPayments,
    DiscountsInactive,
}

impl SettlementEligibility {
    pub fn is_eligible(self) -> bool {
        matches!(self, SettlementEligibility::Eligible)
    }
}

/// early-settlement payoff breakdown; every amount is rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementQuote {
    pub plan_id: PlanId,
    pub settlement_date: NaiveDate,
    pub months_into_loan: Decimal,
    pub months_early: Decimal,

    pub original_principal: Money,
    pub original_interest: Money,
    pub original_total: Money,

    pub principal_discount: Money,
    pub interest_discount: Money,
    pub total_discount: Money,

    pub discounted_principal: Money,
    pub discounted_interest: Money,
    pub final_amount: Money,

    pub eligibility: SettlementEligibility,
    /// index into the settings' tier list, when a tier applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_tier: Option<usize>,

    /// settings echoed back for audit
    pub settings: SettlementDiscountSettings,
}
