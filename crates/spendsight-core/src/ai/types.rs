//! Types shared across AI collaborator backends

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryBreakdown, Expense, Snapshot};

/// Categories a collaborator may assign to an expense
pub const VALID_CATEGORIES: [&str; 12] = [
    "Food",
    "Transportation",
    "Bills",
    "Entertainment",
    "Housing",
    "Groceries",
    "Health",
    "Education",
    "Personal Care",
    "Savings",
    "Travel",
    "Other",
];

/// One free-text observation about spending behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingInsight {
    pub message: String,
    /// 0.0 - 1.0
    pub confidence: f64,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Collaborator-produced health evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub score: f64,
    pub grade: String,
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Compact spending summary handed to the collaborator for insight generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_expenses: f64,
    pub category_breakdown: CategoryBreakdown,
    /// `YYYY-MM` -> total
    pub monthly_expenses: BTreeMap<String, f64>,
    pub expense_count: usize,
}

impl ExpenseSummary {
    pub fn from_records(records: &[Expense]) -> Self {
        let mut category_breakdown = CategoryBreakdown::new();
        let mut monthly_expenses: BTreeMap<String, f64> = BTreeMap::new();
        for expense in records {
            *category_breakdown
                .entry(expense.category.clone())
                .or_insert(0.0) += expense.amount;
            *monthly_expenses.entry(expense.month_label()).or_insert(0.0) += expense.amount;
        }
        Self {
            total_expenses: records.iter().map(|e| e.amount).sum(),
            category_breakdown,
            monthly_expenses,
            expense_count: records.len(),
        }
    }
}

/// Current-month metrics handed to the collaborator for health scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub monthly_expenses: f64,
    pub monthly_salary: f64,
    pub total_budget: f64,
    /// Percent of the combined budget used this month (0 with no budget)
    pub budget_utilization: f64,
    pub category_spending: CategoryBreakdown,
    pub expense_count: usize,
}

impl HealthMetrics {
    /// Build metrics for the month containing `now`.
    pub fn from_snapshot(snapshot: &Snapshot, now: NaiveDate) -> Self {
        let label = format!("{:04}-{:02}", now.year(), now.month());
        let current: Vec<&Expense> = snapshot
            .expenses
            .iter()
            .filter(|e| e.month_label() == label)
            .collect();

        let monthly_expenses: f64 = current.iter().map(|e| e.amount).sum();
        let mut category_spending = CategoryBreakdown::new();
        for expense in &current {
            *category_spending
                .entry(expense.category.clone())
                .or_insert(0.0) += expense.amount;
        }

        let total_budget: f64 = snapshot.budgets.iter().map(|b| b.amount).sum();
        let budget_utilization = if total_budget > 0.0 {
            monthly_expenses / total_budget * 100.0
        } else {
            0.0
        };

        Self {
            monthly_expenses,
            monthly_salary: snapshot.salary.monthly,
            total_budget,
            budget_utilization,
            category_spending,
            expense_count: current.len(),
        }
    }
}
