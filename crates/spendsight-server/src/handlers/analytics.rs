//! Analytics, prediction, alert, and health handlers
//!
//! Every handler takes a point-in-time store snapshot and hands it to the
//! engine, anchored at today's local date.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use spendsight_core::ai::types::HealthMetrics;
use spendsight_core::ai::Provenance;
use spendsight_core::analytics::DashboardReport;
use spendsight_core::models::{BudgetAlert, ExpenseAnalytics, Prediction};

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// GET /api/expenses/analytics - Aggregate spending analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExpenseAnalytics>, AppError> {
    let snapshot = state.store.snapshot().map_err(AppError::from_core)?;
    Ok(Json(state.engine.analytics(&snapshot, today())))
}

/// GET /api/expenses/predict-month - End-of-month spend forecast
pub async fn predict_month(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Prediction>, AppError> {
    let snapshot = state.store.snapshot().map_err(AppError::from_core)?;
    Ok(Json(state.engine.prediction(&snapshot, today())))
}

/// GET /api/budget/alerts - Budgets crossing the warning/danger thresholds
pub async fn get_budget_alerts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BudgetAlert>>, AppError> {
    let snapshot = state.store.snapshot().map_err(AppError::from_core)?;
    Ok(Json(state.engine.alerts(&snapshot, today())))
}

/// GET /api/dashboard - Analytics, forecast, alerts, and health in one payload
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardReport>, AppError> {
    let snapshot = state.store.snapshot().map_err(AppError::from_core)?;
    Ok(Json(state.engine.report(&snapshot, today())))
}

/// Health report; deterministic baseline, optionally enriched by the
/// collaborator's assessment
#[derive(Serialize)]
pub struct FinancialHealthResponse {
    pub score: f64,
    pub grade: String,
    pub spending_ratio: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborator_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborator_grade: Option<String>,
}

/// GET /api/financial-health - Financial health score
///
/// The deterministic scorer always produces the baseline score. When the
/// collaborator is reachable and returns a well-formed assessment, its
/// factors and recommendations are appended and its score reported
/// alongside; a collaborator failure never degrades this endpoint below
/// the baseline.
pub async fn get_financial_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FinancialHealthResponse>, AppError> {
    let snapshot = state.store.snapshot().map_err(AppError::from_core)?;
    let now = today();
    let baseline = state.engine.health(&snapshot, now);

    let mut response = FinancialHealthResponse {
        score: baseline.score,
        grade: baseline.grade,
        spending_ratio: baseline.spending_ratio,
        insights: baseline.insights,
        recommendations: baseline.recommendations,
        source: "deterministic",
        collaborator_score: None,
        collaborator_grade: None,
    };

    if state.ai.configured() {
        let metrics = HealthMetrics::from_snapshot(&snapshot, now);
        let (assessment, provenance) = state.ai.health_assessment(&metrics).await;
        if provenance == Provenance::Collaborator {
            response.source = "collaborator";
            response.collaborator_score = Some(assessment.score);
            response.collaborator_grade = Some(assessment.grade);
            response.insights.extend(assessment.factors);
            response.recommendations.extend(assessment.recommendations);
        }
    }

    Ok(Json(response))
}
