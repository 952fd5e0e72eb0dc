//! Domain models for Spendsight

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single expense record
///
/// Immutable once created; removed only by id through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Calendar day the expense occurred (ISO `YYYY-MM-DD` on the wire)
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// The `YYYY-MM` label of the month this expense falls in
    pub fn month_label(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Ingestion form for a new expense, validated before it reaches the core
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub name: String,
    pub amount: f64,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl NewExpense {
    /// Validate and promote to a full [`Expense`] record.
    ///
    /// The analytics core assumes well-formed records, so every field is
    /// checked here: non-empty name, non-negative amount, parseable date.
    pub fn into_expense(self) -> Result<Expense> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("expense name must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::Validation(format!(
                "expense amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            Error::Validation(format!("invalid expense date '{}': {}", self.date, e))
        })?;

        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            amount: self.amount,
            date,
            category: if self.category.trim().is_empty() {
                "Other".to_string()
            } else {
                self.category.trim().to_string()
            },
            description: self.description,
            created_at: Utc::now(),
        })
    }
}

/// A configured spending limit for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: f64,
    /// Only "monthly" is meaningful today; stored verbatim
    pub period: String,
    pub created_at: DateTime<Utc>,
}

/// Ingestion form for a new budget
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "monthly".to_string()
}

impl NewBudget {
    pub fn into_budget(self) -> Result<Budget> {
        if self.category.trim().is_empty() {
            return Err(Error::Validation("budget category must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::Validation(format!(
                "budget amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        Ok(Budget {
            id: Uuid::new_v4().to_string(),
            category: self.category.trim().to_string(),
            amount: self.amount,
            period: self.period,
            created_at: Utc::now(),
        })
    }
}

/// Monthly income figure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salary {
    pub monthly: f64,
    pub currency: String,
}

impl Default for Salary {
    fn default() -> Self {
        Self {
            monthly: 0.0,
            currency: "INR".to_string(),
        }
    }
}

/// Immutable view of the store handed to the analytics engine
///
/// The engine never sees the store itself; it operates on a point-in-time
/// copy and produces derived, transient results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
    pub salary: Salary,
}

/// Category -> summed amount over some record set
pub type CategoryBreakdown = BTreeMap<String, f64>;

/// Aggregated total/count of expenses for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
    pub count: usize,
}

/// Aggregate analytics payload; field names are part of the wire contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseAnalytics {
    pub total_expenses: f64,
    pub category_breakdown: CategoryBreakdown,
    pub monthly_trend: Vec<MonthlyBucket>,
    pub average_daily_spend: f64,
    pub highest_spending_category: String,
    pub spending_growth: f64,
}

/// End-of-month spend forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_total: f64,
    /// 0-100
    pub confidence: f64,
    pub message: String,
    pub current_spent: f64,
    pub daily_average: f64,
    pub days_elapsed: u32,
    pub days_remaining: u32,
    pub historical_monthly_average: f64,
    pub historical_month_count: usize,
}

/// Severity of a budget alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// 75% <= usage < 90%
    Warning,
    /// usage >= 90%
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "warning" => Ok(AlertSeverity::Warning),
            "danger" => Ok(AlertSeverity::Danger),
            _ => Err(format!("Unknown alert severity: {}", s)),
        }
    }
}

/// Threshold alert for one category budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub budget_amount: f64,
    pub spent_amount: f64,
    pub percentage_used: f64,
    pub alert_type: AlertSeverity,
    /// Days left in the period under the fixed-length-month assumption
    pub days_remaining: i64,
}

/// Heuristic 0-100 financial health summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: f64,
    pub grade: String,
    /// Percent of monthly income spent this month (0 when no income configured)
    pub spending_ratio: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}
