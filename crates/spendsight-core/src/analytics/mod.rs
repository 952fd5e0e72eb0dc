//! Financial Analytics & Prediction Engine
//!
//! The computational core of Spendsight:
//! - `aggregate`: category breakdown, monthly trend, daily averages
//! - `predict`: blended end-of-month spend forecast
//! - `alerts`: budget threshold evaluation
//! - `health`: spend-to-income health scoring
//! - `engine`: facade assembling the dashboard payload from a snapshot
//!
//! All computation is pure over an immutable snapshot plus an injectable
//! anchor date; nothing here holds state between calls.

pub mod aggregate;
pub mod alerts;
pub mod engine;
pub mod health;
pub mod predict;

pub use aggregate::{
    average_daily_spend, category_breakdown, growth_rate, highest_category, monthly_trend,
    TREND_MONTHS,
};
pub use alerts::{BudgetAlertEvaluator, ASSUMED_DAYS_IN_MONTH, DANGER_THRESHOLD, WARNING_THRESHOLD};
pub use engine::{AnalyticsEngine, DashboardReport};
pub use health::{HealthScorer, NO_INCOME_SCORE};
pub use predict::{days_in_month, predict_month};
