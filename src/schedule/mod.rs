pub mod aggregate;
pub mod balloon;
pub mod amortized;
pub mod dynamic_rent;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ActualStatus, PaymentInterval, PaymentType, ProjectedStatus};

pub use aggregate::{aggregate_monthly, MonthlyRollup};
pub use balloon::BalloonScheduleGenerator;
pub use amortized::AmortizedScheduleGenerator;
pub use dynamic_rent::PaymentScheduleGenerator;

/// calculation granularity for daily schedules: one tenure month spans 30
/// payment days
pub const DAYS_PER_TENURE_MONTH: u32 = 30;

/// one due obligation in a generated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// 0 for the down payment, then 1.. in period order
    pub period: u32,
    pub due_date: NaiveDate,
    /// total due for the period: principal + rent
    pub amount: Money,
    pub principal: Money,
    pub rent: Money,
    pub payment_type: PaymentType,
    pub is_balloon: bool,
    /// generation-time projection from due date vs the injected clock
    pub projected_status: ProjectedStatus,
    /// live overlay applied by the owning application; absent at generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_status: Option<ActualStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
}

impl PaymentScheduleEntry {
    /// live status when overlaid, otherwise the generation-time projection
    pub fn effective_status(&self) -> ActualStatus {
        self.actual_status
            .unwrap_or_else(|| self.projected_status.as_actual())
    }

    pub fn is_paid(&self) -> bool {
        self.effective_status().is_paid()
    }
}

/// raw output of a schedule generator, before plan assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub entries: Vec<PaymentScheduleEntry>,
    /// sum of every entry amount, down payment and balloon included
    pub total_amount: Money,
    /// sum of every rent component
    pub total_rent: Money,
    /// first-period installment amount
    pub first_payment_amount: Money,
}

impl GeneratedSchedule {
    pub fn from_entries(entries: Vec<PaymentScheduleEntry>) -> Self {
        let total_amount = entries.iter().map(|e| e.amount).sum();
        let total_rent = entries.iter().map(|e| e.rent).sum();
        let first_payment_amount = entries
            .iter()
            .find(|e| e.payment_type != PaymentType::DownPayment)
            .map(|e| e.amount)
            .unwrap_or(Money::ZERO);

        Self {
            entries,
            total_amount,
            total_rent,
            first_payment_amount,
        }
    }
}

/// Derive the generation-time status of an entry from its due date.
///
/// Same-period dates are active, strictly past periods are projected paid,
/// future periods upcoming. The paid projection backfills history for
/// display; it is not payment truth.
pub fn project_status(
    due_date: NaiveDate,
    today: NaiveDate,
    interval: &PaymentInterval,
) -> ProjectedStatus {
    let same_period = if interval.is_daily() {
        due_date == today
    } else {
        due_date.year() == today.year() && due_date.month() == today.month()
    };

    if same_period {
        ProjectedStatus::Active
    } else if due_date < today {
        ProjectedStatus::Paid
    } else {
        ProjectedStatus::Upcoming
    }
}

/// add calendar months, clamping the day into the target month
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// advance a due date by `periods` payment periods
pub fn add_periods(date: NaiveDate, periods: u32, interval: &PaymentInterval) -> NaiveDate {
    if interval.is_daily() {
        date.checked_add_days(chrono::Days::new(periods as u64))
            .unwrap_or(date)
    } else {
        add_months(date, periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_status_projection() {
        let today = d(2025, 6, 15);
        let interval = PaymentInterval::Monthly;

        assert_eq!(project_status(d(2025, 5, 15), today, &interval), ProjectedStatus::Paid);
        // same calendar month counts as the active period, even if past
        assert_eq!(project_status(d(2025, 6, 1), today, &interval), ProjectedStatus::Active);
        assert_eq!(project_status(d(2025, 6, 30), today, &interval), ProjectedStatus::Active);
        assert_eq!(project_status(d(2025, 7, 15), today, &interval), ProjectedStatus::Upcoming);
    }

    #[test]
    fn test_daily_status_projection() {
        let today = d(2025, 6, 15);
        let interval = PaymentInterval::Daily;

        assert_eq!(project_status(d(2025, 6, 14), today, &interval), ProjectedStatus::Paid);
        assert_eq!(project_status(d(2025, 6, 15), today, &interval), ProjectedStatus::Active);
        assert_eq!(project_status(d(2025, 6, 16), today, &interval), ProjectedStatus::Upcoming);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2025, 3, 15), 12), d(2026, 3, 15));
    }

    #[test]
    fn test_effective_status_prefers_overlay() {
        let mut entry = PaymentScheduleEntry {
            period: 1,
            due_date: d(2025, 1, 1),
            amount: Money::from_major(100),
            principal: Money::from_major(90),
            rent: Money::from_major(10),
            payment_type: PaymentType::Installment,
            is_balloon: false,
            projected_status: ProjectedStatus::Paid,
            actual_status: None,
            paid_amount: None,
            remaining_amount: None,
            paid_date: None,
        };

        assert_eq!(entry.effective_status(), ActualStatus::Paid);

        // the application later learns the entry was in fact never paid
        entry.actual_status = Some(ActualStatus::Unpaid);
        assert_eq!(entry.effective_status(), ActualStatus::Unpaid);
    }
}
