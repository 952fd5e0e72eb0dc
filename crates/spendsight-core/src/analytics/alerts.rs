//! Budget threshold alerts
//!
//! Compares current-calendar-month spend per category against configured
//! limits and emits an alert once 75% of a limit is used.

use chrono::{Datelike, NaiveDate};

use crate::models::{AlertSeverity, Budget, BudgetAlert, Expense};

/// Percentage of a limit at which an alert is first emitted.
pub const WARNING_THRESHOLD: f64 = 75.0;
/// Percentage of a limit at which an alert escalates to danger.
pub const DANGER_THRESHOLD: f64 = 90.0;

/// Fixed month length used for the days-remaining figure.
///
/// Known simplification carried over from the original behavior: alert
/// day-counting assumes a 30-day month regardless of the calendar, so the
/// figure can go negative on the 31st. Kept configurable rather than
/// silently corrected.
pub const ASSUMED_DAYS_IN_MONTH: i64 = 30;

/// Evaluates configured budgets against current-month spend
pub struct BudgetAlertEvaluator {
    assumed_days_in_month: i64,
}

impl BudgetAlertEvaluator {
    pub fn new() -> Self {
        Self {
            assumed_days_in_month: ASSUMED_DAYS_IN_MONTH,
        }
    }

    pub fn with_assumed_days(days: i64) -> Self {
        Self {
            assumed_days_in_month: days,
        }
    }

    /// Evaluate every budget and return alerts for those at or past the
    /// warning threshold.
    ///
    /// A zero limit yields 0% used (never an alert, never a fault).
    pub fn evaluate(
        &self,
        expenses: &[Expense],
        budgets: &[Budget],
        now: NaiveDate,
    ) -> Vec<BudgetAlert> {
        let current_label = now.format("%Y-%m").to_string();
        let days_remaining = self.assumed_days_in_month - now.day() as i64;

        let mut alerts = Vec::new();
        for budget in budgets {
            let spent: f64 = expenses
                .iter()
                .filter(|e| e.category == budget.category && e.month_label() == current_label)
                .map(|e| e.amount)
                .sum();

            let percentage_used = if budget.amount > 0.0 {
                spent / budget.amount * 100.0
            } else {
                0.0
            };

            if percentage_used < WARNING_THRESHOLD {
                continue;
            }

            let alert_type = if percentage_used >= DANGER_THRESHOLD {
                AlertSeverity::Danger
            } else {
                AlertSeverity::Warning
            };

            alerts.push(BudgetAlert {
                category: budget.category.clone(),
                budget_amount: budget.amount,
                spent_amount: spent,
                percentage_used,
                alert_type,
                days_remaining,
            });
        }

        alerts
    }
}

impl Default for BudgetAlertEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
