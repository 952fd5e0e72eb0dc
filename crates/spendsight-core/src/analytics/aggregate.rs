//! Expense aggregation
//!
//! Groups raw expense records by category and by calendar month and derives
//! the summary figures the dashboard is built from. Every function here is a
//! pure function of its inputs; the anchor date is passed in so results are
//! deterministic in tests.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::models::{CategoryBreakdown, Expense, MonthlyBucket};

/// Number of months covered by [`monthly_trend`], current month included.
pub const TREND_MONTHS: usize = 6;

/// Sum expense amounts per category.
///
/// The sum of all values equals the total of the record set. Ordering of the
/// categories is not semantically meaningful.
pub fn category_breakdown(records: &[Expense]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::new();
    for expense in records {
        *breakdown.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    breakdown
}

/// Bucket expenses into the six calendar months ending at `anchor`'s month.
///
/// Always yields exactly [`TREND_MONTHS`] buckets in ascending `YYYY-MM`
/// order, zero-filled for months with no activity. Year boundaries wrap
/// correctly (e.g. anchored at 2025-02 the window starts at 2024-09).
pub fn monthly_trend(records: &[Expense], anchor: NaiveDate) -> Vec<MonthlyBucket> {
    let mut buckets = Vec::with_capacity(TREND_MONTHS);

    let mut year = anchor.year();
    let mut month = anchor.month() as i32;

    for _ in 0..TREND_MONTHS {
        let label = format!("{:04}-{:02}", year, month);
        let (total, count) = records
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() as i32 == month)
            .fold((0.0, 0), |(total, count), e| (total + e.amount, count + 1));

        buckets.push(MonthlyBucket {
            month: label,
            total,
            count,
        });

        month -= 1;
        if month == 0 {
            month = 12;
            year -= 1;
        }
    }

    buckets.reverse();
    buckets
}

/// Total amount divided by the number of *distinct* dates present.
///
/// This is an average over active days, not calendar days in the period.
/// Returns 0 for an empty record set.
pub fn average_daily_spend(records: &[Expense]) -> f64 {
    let distinct_dates: HashSet<NaiveDate> = records.iter().map(|e| e.date).collect();
    if distinct_dates.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|e| e.amount).sum();
    total / distinct_dates.len() as f64
}

/// Category with the maximum summed amount, or "" for an empty breakdown.
///
/// Ties resolve to the first category encountered in iteration order; this is
/// implementation-defined and callers must not rely on it.
pub fn highest_category(breakdown: &CategoryBreakdown) -> String {
    let mut best: Option<(&String, f64)> = None;
    for (category, &total) in breakdown {
        match best {
            Some((_, max)) if total <= max => {}
            _ => best = Some((category, total)),
        }
    }
    best.map(|(category, _)| category.clone()).unwrap_or_default()
}

/// Percent change between the last two monthly buckets.
///
/// 0 when fewer than two buckets exist or the earlier total is 0; never
/// propagates infinity or NaN.
pub fn growth_rate(trend: &[MonthlyBucket]) -> f64 {
    if trend.len() < 2 {
        return 0.0;
    }
    let current = trend[trend.len() - 1].total;
    let previous = trend[trend.len() - 2].total;
    if previous <= 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}
