//! Core library for SpendSight - personal finance analytics
//!
//! This crate contains everything that is independent of the HTTP surface:
//!
//! - [`models`]: expense, budget, and salary records plus the wire-level
//!   report types
//! - [`store`]: JSON-file-backed store with atomic persistence
//! - [`analytics`]: deterministic aggregation, prediction, budget alerts,
//!   and health scoring
//! - [`ai`]: the generative collaborator abstraction with rule-based
//!   degradation
//!
//! The deterministic analytics never depend on the collaborator; the
//! collaborator only ever enriches them.

pub mod ai;
pub mod analytics;
pub mod error;
pub mod models;
pub mod store;

pub use ai::{AiClient, AiService, Collaborator, FallbackReason, Provenance};
pub use analytics::{AnalyticsEngine, BudgetAlertEvaluator, DashboardReport, HealthScorer};
pub use error::{Error, Result};
pub use models::{
    AlertSeverity, Budget, BudgetAlert, Expense, ExpenseAnalytics, HealthReport, NewBudget,
    NewExpense, Prediction, Salary, Snapshot,
};
pub use store::ExpenseStore;
