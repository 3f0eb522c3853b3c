use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::schedule::PaymentScheduleEntry;
use crate::types::ActualStatus;

/// one synthetic display row covering a calendar month of a daily schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRollup {
    pub year: i32,
    pub month: u32,
    /// latest due date folded into this row
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: ActualStatus,
    /// latest paid date among paid entries in the month
    pub paid_date: Option<NaiveDate>,
    pub entry_count: usize,
}

/// Collapse a daily schedule into one row per calendar month.
///
/// A schedule is treated as daily when any calendar month holds more than
/// one entry; otherwise each entry maps to its own row unchanged. The month
/// is paid only when every entry in it is paid; otherwise the worst status
/// wins. The source schedule is never touched.
pub fn aggregate_monthly(entries: &[PaymentScheduleEntry]) -> Vec<MonthlyRollup> {
    let buckets = bucket_by_month(entries);

    let is_daily = buckets.iter().any(|(_, group)| group.len() > 1);
    if !is_daily {
        return entries.iter().map(|e| rollup(std::slice::from_ref(e))).collect();
    }

    buckets.iter().map(|(_, group)| rollup(group)).collect()
}

/// group entries by calendar month, preserving schedule order
fn bucket_by_month(
    entries: &[PaymentScheduleEntry],
) -> Vec<((i32, u32), Vec<PaymentScheduleEntry>)> {
    let mut buckets: Vec<((i32, u32), Vec<PaymentScheduleEntry>)> = Vec::new();

    for entry in entries {
        let key = (entry.due_date.year(), entry.due_date.month());
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(entry.clone()),
            None => buckets.push((key, vec![entry.clone()])),
        }
    }

    buckets
}

fn rollup(group: &[PaymentScheduleEntry]) -> MonthlyRollup {
    let first = &group[0];
    let amount = group.iter().map(|e| e.amount).sum();
    let due_date = group.iter().map(|e| e.due_date).max().unwrap_or(first.due_date);

    let status = if group.iter().all(|e| e.is_paid()) {
        ActualStatus::Paid
    } else {
        group
            .iter()
            .map(|e| e.effective_status())
            .max_by_key(|s| s.severity())
            .unwrap_or(ActualStatus::Upcoming)
    };

    let paid_date = group
        .iter()
        .filter(|e| e.is_paid())
        .filter_map(|e| e.paid_date)
        .max();

    MonthlyRollup {
        year: first.due_date.year(),
        month: first.due_date.month(),
        due_date,
        amount,
        status,
        paid_date,
        entry_count: group.len(),
    }
}
