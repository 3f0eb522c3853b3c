use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::plan::InstallmentPlan;
use crate::schedule::add_periods;
use crate::types::{CalculationMethod, PaymentType};

/// gamification label for an ownership level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneLabel {
    FirstPayment,
    Quarter,
    Halfway,
    ThreeQuarters,
    AlmostThere,
    FullOwner,
}

impl MilestoneLabel {
    /// first threshold matched, scanning ascending
    pub fn for_percentage(pct: Decimal) -> Option<Self> {
        if pct >= Decimal::from(100) {
            Some(MilestoneLabel::FullOwner)
        } else if pct >= Decimal::from(95) {
            Some(MilestoneLabel::AlmostThere)
        } else if pct >= Decimal::from(75) {
            Some(MilestoneLabel::ThreeQuarters)
        } else if pct >= Decimal::from(50) {
            Some(MilestoneLabel::Halfway)
        } else if pct >= Decimal::from(25) {
            Some(MilestoneLabel::Quarter)
        } else {
            None
        }
    }
}

/// ownership level at one schedule entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub period: u32,
    pub due_date: NaiveDate,
    pub ownership_percentage: Decimal,
    pub label: Option<MilestoneLabel>,
}

/// first schedule entry at which a label is reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub label: MilestoneLabel,
    pub period: u32,
    pub due_date: NaiveDate,
    pub ownership_percentage: Decimal,
    /// whether the entry carrying the milestone is already paid
    pub reached: bool,
}

/// ownership progression over a plan's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OwnershipTimeline {
    pub points: Vec<TimelinePoint>,
    pub milestones: Vec<Milestone>,
    pub total_payments: usize,
    pub completed_payments: usize,
    /// ownership percentage at the last paid entry
    pub current_ownership: Decimal,
    /// completed payments over total payments
    pub progress_percentage: Decimal,
    pub estimated_completion_date: Option<NaiveDate>,
}

impl OwnershipTimeline {
    /// defined empty state for plans that are not loaded yet
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Walks a plan's schedule and derives ownership milestones and progress
/// statistics. Degenerate inputs (no schedule, zero vehicle price) produce
/// the empty timeline rather than an error.
pub struct OwnershipTimelineBuilder;

impl OwnershipTimelineBuilder {
    pub fn build(plan: &InstallmentPlan) -> OwnershipTimeline {
        if plan.schedule.is_empty() || !plan.vehicle_price.is_positive() {
            return OwnershipTimeline::empty();
        }

        let calc = plan.ownership_calculator();
        let mut points = Vec::with_capacity(plan.schedule.len());
        let mut milestones: Vec<Milestone> = Vec::new();

        let mut installment_index: u32 = 0;
        let mut cumulative_principal = Money::ZERO;

        for (position, entry) in plan.schedule.iter().enumerate() {
            cumulative_principal += entry.principal;

            let customer = match (plan.calculation_method, entry.payment_type) {
                (_, PaymentType::DownPayment) => plan.down_payment,
                (CalculationMethod::DynamicRent, _) => {
                    let split = calc.at_index(installment_index);
                    installment_index += 1;
                    split.customer
                }
                (CalculationMethod::BalloonPayment, _) => {
                    let structure = plan.payment_structure.unwrap_or_else(|| {
                        crate::types::PaymentStructure::new(
                            Decimal::ZERO,
                            Decimal::from(100),
                            Decimal::ZERO,
                        )
                    });
                    let balloon_paid = entry.is_balloon && entry.is_paid();
                    let split = calc.balloon_at_index(&structure, installment_index, balloon_paid);
                    installment_index += 1;
                    split.customer
                }
                // amortized principal varies per period; accumulate it
                (CalculationMethod::AmortizedFixed, _) => cumulative_principal,
            };

            let pct = customer.percent_of(plan.vehicle_price).round_dp(2);
            let label = if position == 0 {
                // the opening payment is its own milestone regardless of level
                Some(MilestoneLabel::FirstPayment)
            } else {
                MilestoneLabel::for_percentage(pct)
            };

            if let Some(label) = label {
                if !milestones.iter().any(|m| m.label == label) {
                    milestones.push(Milestone {
                        label,
                        period: entry.period,
                        due_date: entry.due_date,
                        ownership_percentage: pct,
                        reached: entry.is_paid(),
                    });
                }
            }

            points.push(TimelinePoint {
                period: entry.period,
                due_date: entry.due_date,
                ownership_percentage: pct,
                label,
            });
        }

        let total_payments = plan.schedule.len();
        let completed_payments = plan.schedule.iter().filter(|e| e.is_paid()).count();

        let current_ownership = plan
            .schedule
            .iter()
            .zip(points.iter())
            .filter(|(entry, _)| entry.is_paid())
            .last()
            .map(|(_, point)| point.ownership_percentage)
            .unwrap_or_else(|| plan.down_payment.percent_of(plan.vehicle_price).round_dp(2));

        let progress_percentage = if total_payments == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(completed_payments as u64) / Decimal::from(total_payments as u64)
                * Decimal::from(100))
            .round_dp(2)
        };

        // naive linear projection from the last paid entry
        let estimated_completion_date = plan
            .schedule
            .iter()
            .filter(|e| e.is_paid())
            .last()
            .map(|last_paid| {
                let remaining = (total_payments - completed_payments) as u32;
                add_periods(last_paid.due_date, remaining, &plan.interval)
            });

        OwnershipTimeline {
            points,
            milestones,
            total_payments,
            completed_payments,
            current_ownership,
            progress_percentage,
            estimated_completion_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::plan::PlanRequest;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn provider_at(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        ))
    }

    fn plan_at(now: &SafeTimeProvider) -> InstallmentPlan {
        plan_with_tenure(now, "12 Months")
    }

    fn plan_with_tenure(now: &SafeTimeProvider, tenure: &str) -> InstallmentPlan {
        PlanRequest::dynamic_rent(
            Money::from_major(50_000),
            Money::from_major(10_000),
            tenure,
            Rate::from_decimal(dec!(0.12)),
            start(),
        )
        .build(now)
        .unwrap()
    }

    #[test]
    fn test_milestone_thresholds() {
        assert_eq!(MilestoneLabel::for_percentage(dec!(10)), None);
        assert_eq!(MilestoneLabel::for_percentage(dec!(25)), Some(MilestoneLabel::Quarter));
        assert_eq!(MilestoneLabel::for_percentage(dec!(49.99)), Some(MilestoneLabel::Quarter));
        assert_eq!(MilestoneLabel::for_percentage(dec!(50)), Some(MilestoneLabel::Halfway));
        assert_eq!(MilestoneLabel::for_percentage(dec!(94.99)), Some(MilestoneLabel::ThreeQuarters));
        assert_eq!(MilestoneLabel::for_percentage(dec!(95)), Some(MilestoneLabel::AlmostThere));
        assert_eq!(MilestoneLabel::for_percentage(dec!(100)), Some(MilestoneLabel::FullOwner));
    }

    #[test]
    fn test_first_point_is_first_payment() {
        let timeline = OwnershipTimelineBuilder::build(&plan_at(&provider_at(2025, 1, 1)));

        assert_eq!(timeline.points[0].label, Some(MilestoneLabel::FirstPayment));
        assert_eq!(timeline.milestones[0].label, MilestoneLabel::FirstPayment);
        // down payment alone is 20%
        assert_eq!(timeline.points[0].ownership_percentage, dec!(20));
    }

    #[test]
    fn test_milestones_appear_once_in_order() {
        // 24 monthly steps of ~3.33% pass through every threshold band
        let timeline =
            OwnershipTimelineBuilder::build(&plan_with_tenure(&provider_at(2025, 1, 1), "2 Years"));

        let labels: Vec<MilestoneLabel> = timeline.milestones.iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            vec![
                MilestoneLabel::FirstPayment,
                MilestoneLabel::Quarter,
                MilestoneLabel::Halfway,
                MilestoneLabel::ThreeQuarters,
                MilestoneLabel::AlmostThere,
                MilestoneLabel::FullOwner,
            ]
        );
    }

    #[test]
    fn test_twelve_month_plan_skips_the_ninety_five_band() {
        // 6.67% steps jump from 93.33% straight to 100%
        let timeline = OwnershipTimelineBuilder::build(&plan_at(&provider_at(2025, 1, 1)));

        let labels: Vec<MilestoneLabel> = timeline.milestones.iter().map(|m| m.label).collect();
        assert!(!labels.contains(&MilestoneLabel::AlmostThere));
        assert!(labels.contains(&MilestoneLabel::FullOwner));
    }

    #[test]
    fn test_progress_mid_schedule() {
        // june 10: down payment + the feb..may installments projected paid
        let timeline = OwnershipTimelineBuilder::build(&plan_at(&provider_at(2025, 6, 10)));

        assert_eq!(timeline.total_payments, 13);
        assert_eq!(timeline.completed_payments, 5);
        assert_eq!(timeline.progress_percentage, dec!(38.46));
        // 10,000 down + 4 x 3,333.33
        assert_eq!(timeline.current_ownership, dec!(46.67));

        // last paid fell due may 1st; eight entries remain
        assert_eq!(
            timeline.estimated_completion_date,
            Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_nothing_paid_falls_back_to_down_payment() {
        // plan generated before its own start date: nothing projected paid
        let now = provider_at(2024, 11, 1);
        let timeline = OwnershipTimelineBuilder::build(&plan_at(&now));

        assert_eq!(timeline.completed_payments, 0);
        assert_eq!(timeline.current_ownership, dec!(20));
        assert_eq!(timeline.estimated_completion_date, None);
    }

    #[test]
    fn test_empty_schedule_yields_empty_timeline() {
        let mut plan = plan_at(&provider_at(2025, 1, 1));
        plan.schedule.clear();

        let timeline = OwnershipTimelineBuilder::build(&plan);
        assert!(timeline.milestones.is_empty());
        assert_eq!(timeline.progress_percentage, Decimal::ZERO);
    }
}
