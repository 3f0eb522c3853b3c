use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::warn;

use crate::decimal::Money;
use crate::errors::Result;
use crate::plan::InstallmentPlan;
use crate::schedule::{add_months, PaymentScheduleEntry};
use crate::settlement::{
    DiscountType, SettlementDiscountSettings, SettlementEligibility, SettlementQuote,
};
use crate::types::{CalculationMethod, PaymentType};

/// Computes the early-settlement payoff for a plan's remaining obligations.
///
/// Eligibility gates are evaluated in a fixed order; any failure produces a
/// no-discount quote with the principal and interest reported unchanged.
/// Tier selection is first-match by list order, then the flat rules; caps
/// apply afterwards, amount cap before percentage cap, each as a
/// proportional scale-down of the discounts standing at that point.
pub struct SettlementDiscountCalculator<'a> {
    plan: &'a InstallmentPlan,
    settings: &'a SettlementDiscountSettings,
}

impl<'a> SettlementDiscountCalculator<'a> {
    pub fn new(plan: &'a InstallmentPlan, settings: &'a SettlementDiscountSettings) -> Self {
        Self { plan, settings }
    }

    pub fn quote(
        &self,
        remaining: &[PaymentScheduleEntry],
        settlement_date: Option<NaiveDate>,
        time: &SafeTimeProvider,
    ) -> Result<SettlementQuote> {
        self.settings.validate()?;

        let overlaps = self.settings.overlap_warnings();
        if !overlaps.is_empty() {
            warn!(
                pairs = overlaps.len(),
                "discount tiers have overlapping ranges; first match by list order wins"
            );
        }

        let settlement_date = settlement_date.unwrap_or_else(|| time.now().date_naive());

        let months_into_loan = months_between(self.loan_start(), settlement_date);
        let months_early =
            (Decimal::from(self.plan.tenure_months) - months_into_loan).max(Decimal::ZERO);

        let (total_principal, total_interest) = self.remaining_totals(remaining);
        let original_total = total_principal + total_interest;

        let eligibility = if months_early < Decimal::ONE {
            SettlementEligibility::SettlementTooLate
        } else if original_total < self.settings.min_settlement_amount {
            SettlementEligibility::BelowMinimumAmount
        } else if remaining.len() < self.settings.min_remaining_payments {
            SettlementEligibility::TooFewRemainingPayments
        } else if !self.settings.is_active {
            SettlementEligibility::DiscountsInactive
        } else {
            SettlementEligibility::Eligible
        };

        if !eligibility.is_eligible() {
            return Ok(self.assemble(
                settlement_date,
                months_into_loan,
                months_early,
                total_principal,
                total_interest,
                Money::ZERO,
                Money::ZERO,
                eligibility,
                None,
            ));
        }

        let (mut principal_discount, mut interest_discount, applied_tier) =
            self.raw_discounts(months_early, total_principal, total_interest);

        // a discount never exceeds its own component
        principal_discount = principal_discount.min(total_principal);
        interest_discount = interest_discount.min(total_interest);

        // amount cap, then percentage cap; both can bind
        if let Some(cap) = self.settings.max_discount_amount {
            (principal_discount, interest_discount) =
                scale_to_cap(principal_discount, interest_discount, cap);
        }
        if let Some(pct) = self.settings.max_discount_percentage {
            let bound = original_total.percentage(pct);
            (principal_discount, interest_discount) =
                scale_to_cap(principal_discount, interest_discount, bound);
        }

        Ok(self.assemble(
            settlement_date,
            months_into_loan,
            months_early,
            total_principal,
            total_interest,
            principal_discount,
            interest_discount,
            SettlementEligibility::Eligible,
            applied_tier,
        ))
    }

    /// loan start: first installment due date minus one period, the plan's
    /// first entry, or its creation date, in that order of preference
    fn loan_start(&self) -> NaiveDate {
        let first_installment = self
            .plan
            .schedule
            .iter()
            .find(|e| e.payment_type == PaymentType::Installment);

        if let Some(entry) = first_installment {
            if self.plan.interval.is_daily() {
                return entry
                    .due_date
                    .pred_opt()
                    .unwrap_or(entry.due_date);
            }
            return entry
                .due_date
                .checked_sub_months(chrono::Months::new(1))
                .unwrap_or(entry.due_date);
        }

        self.plan
            .schedule
            .first()
            .map(|e| e.due_date)
            .unwrap_or(self.plan.created_at)
    }

    /// Principal and interest still owed across the remaining entries.
    ///
    /// For dynamic-rent plans the rent is recomputed from the ownership
    /// model exactly as generation does: constant principal share, rent on
    /// the company's stake at each period's opening. Other methods carry
    /// their per-entry components.
    fn remaining_totals(&self, remaining: &[PaymentScheduleEntry]) -> (Money, Money) {
        let period_rate = self
            .plan
            .annual_rental_rate
            .periodic(self.plan.interval.periods_per_year());

        let mut principal = Money::ZERO;
        let mut interest = Money::ZERO;

        for entry in remaining {
            principal += entry.principal;

            let rent = match (self.plan.calculation_method, entry.payment_type) {
                (CalculationMethod::DynamicRent, PaymentType::Installment) => {
                    let bought_down = entry.principal * Decimal::from(entry.period - 1);
                    let stake = (self.plan.vehicle_price
                        - self.plan.down_payment
                        - bought_down)
                        .max(Money::ZERO);
                    period_rate.rent_on(stake)
                }
                _ => entry.rent,
            };
            interest += rent;
        }

        (principal, interest)
    }

    /// tier discounts when one matches, otherwise the flat rules
    fn raw_discounts(
        &self,
        months_early: Decimal,
        total_principal: Money,
        total_interest: Money,
    ) -> (Money, Money, Option<usize>) {
        let matched = self
            .settings
            .tiered_discounts
            .iter()
            .enumerate()
            .find(|(_, tier)| tier.matches(months_early));

        if let Some((index, tier)) = matched {
            let principal = apply_discount(
                tier.principal_discount,
                tier.principal_discount_type,
                total_principal,
            );
            let interest = apply_discount(
                tier.interest_discount,
                tier.interest_discount_type,
                total_interest,
            );
            return (principal, interest, Some(index));
        }

        let principal = if self.settings.principal_discount_enabled
            && total_principal >= self.settings.principal_discount_min_amount
        {
            apply_discount(
                self.settings.principal_discount_value,
                self.settings.principal_discount_type,
                total_principal,
            )
        } else {
            Money::ZERO
        };

        let interest = if self.settings.interest_discount_enabled
            && total_interest >= self.settings.interest_discount_min_amount
        {
            apply_discount(
                self.settings.interest_discount_value,
                self.settings.interest_discount_type,
                total_interest,
            )
        } else {
            Money::ZERO
        };

        (principal, interest, None)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        settlement_date: NaiveDate,
        months_into_loan: Decimal,
        months_early: Decimal,
        total_principal: Money,
        total_interest: Money,
        principal_discount: Money,
        interest_discount: Money,
        eligibility: SettlementEligibility,
        applied_tier: Option<usize>,
    ) -> SettlementQuote {
        let original_principal = total_principal.to_cents();
        let original_interest = total_interest.to_cents();
        let original_total = (total_principal + total_interest).to_cents();

        let principal_discount = principal_discount.to_cents();
        let interest_discount = interest_discount.to_cents();
        let total_discount = principal_discount + interest_discount;

        SettlementQuote {
            plan_id: self.plan.id,
            settlement_date,
            months_into_loan: months_into_loan.round_dp(2),
            months_early: months_early.round_dp(2),
            original_principal,
            original_interest,
            original_total,
            principal_discount,
            interest_discount,
            total_discount,
            discounted_principal: original_principal - principal_discount,
            discounted_interest: original_interest - interest_discount,
            final_amount: original_total - total_discount,
            eligibility,
            applied_tier,
            settings: self.settings.clone(),
        }
    }
}

fn apply_discount(value: Decimal, discount_type: DiscountType, amount: Money) -> Money {
    match discount_type {
        DiscountType::Percentage => amount.percentage(value),
        DiscountType::Fixed => Money::from_decimal(value).min(amount),
    }
}

/// proportionally shrink both components so their sum fits the cap
fn scale_to_cap(principal: Money, interest: Money, cap: Money) -> (Money, Money) {
    let total = principal + interest;
    if total <= cap || !total.is_positive() {
        return (principal, interest);
    }
    let scale = cap.as_decimal() / total.as_decimal();
    (principal * scale, interest * scale)
}

/// elapsed calendar months between two dates: whole months plus the day
/// fraction of the month in progress
fn months_between(start: NaiveDate, end: NaiveDate) -> Decimal {
    use chrono::Datelike;

    if end <= start {
        return Decimal::ZERO;
    }

    let mut whole =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if whole > 0 && add_months(start, whole as u32) > end {
        whole -= 1;
    }
    let whole = whole.max(0) as u32;

    let anchor = add_months(start, whole);
    let next = add_months(start, whole + 1);
    let span_days = (next - anchor).num_days();
    let extra_days = (end - anchor).num_days();

    if span_days <= 0 || extra_days <= 0 {
        return Decimal::from(whole);
    }

    Decimal::from(whole) + Decimal::from(extra_days) / Decimal::from(span_days)
}
