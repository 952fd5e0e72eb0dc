//! Analytics engine - orchestrates the analytics components over a snapshot

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{BudgetAlert, ExpenseAnalytics, HealthReport, Prediction, Snapshot};

use super::aggregate;
use super::alerts::BudgetAlertEvaluator;
use super::health::HealthScorer;
use super::predict;

/// Everything the dashboard needs, computed in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub analytics: ExpenseAnalytics,
    pub prediction: Prediction,
    pub alerts: Vec<BudgetAlert>,
    pub health: HealthReport,
}

/// Stateless facade over the aggregator, predictor, alert evaluator and
/// health scorer.
///
/// Holds no data between calls; every method takes an immutable [`Snapshot`]
/// and an injectable anchor date so results are deterministic in tests.
pub struct AnalyticsEngine {
    alert_evaluator: BudgetAlertEvaluator,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            alert_evaluator: BudgetAlertEvaluator::new(),
        }
    }

    /// Aggregate analytics over the whole record set.
    pub fn analytics(&self, snapshot: &Snapshot, now: NaiveDate) -> ExpenseAnalytics {
        let records = &snapshot.expenses;
        let breakdown = aggregate::category_breakdown(records);
        let trend = aggregate::monthly_trend(records, now);
        let spending_growth = aggregate::growth_rate(&trend);
        let highest_spending_category = aggregate::highest_category(&breakdown);

        ExpenseAnalytics {
            total_expenses: records.iter().map(|e| e.amount).sum(),
            average_daily_spend: aggregate::average_daily_spend(records),
            highest_spending_category,
            spending_growth,
            category_breakdown: breakdown,
            monthly_trend: trend,
        }
    }

    /// End-of-month spend forecast.
    pub fn prediction(&self, snapshot: &Snapshot, now: NaiveDate) -> Prediction {
        predict::predict_month(&snapshot.expenses, now)
    }

    /// Budget threshold alerts for the current month.
    pub fn alerts(&self, snapshot: &Snapshot, now: NaiveDate) -> Vec<BudgetAlert> {
        self.alert_evaluator
            .evaluate(&snapshot.expenses, &snapshot.budgets, now)
    }

    /// Health score from current-month spend against configured salary.
    pub fn health(&self, snapshot: &Snapshot, now: NaiveDate) -> HealthReport {
        let total_spent = self.current_month_spend(snapshot, now);
        HealthScorer::score(total_spent, &snapshot.salary)
    }

    /// Assemble the full dashboard payload.
    pub fn report(&self, snapshot: &Snapshot, now: NaiveDate) -> DashboardReport {
        tracing::debug!(
            expenses = snapshot.expenses.len(),
            budgets = snapshot.budgets.len(),
            year = now.year(),
            month = now.month(),
            "Computing dashboard report"
        );
        DashboardReport {
            analytics: self.analytics(snapshot, now),
            prediction: self.prediction(snapshot, now),
            alerts: self.alerts(snapshot, now),
            health: self.health(snapshot, now),
        }
    }

    /// Sum of amounts in the month containing `now`.
    pub fn current_month_spend(&self, snapshot: &Snapshot, now: NaiveDate) -> f64 {
        let label = now.format("%Y-%m").to_string();
        snapshot
            .expenses
            .iter()
            .filter(|e| e.month_label() == label)
            .map(|e| e.amount)
            .sum()
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
