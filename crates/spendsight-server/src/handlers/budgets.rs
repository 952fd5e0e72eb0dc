//! Budget handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use spendsight_core::models::{Budget, NewBudget};

/// GET /api/budgets - List configured budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let budgets = state.store.list_budgets().map_err(AppError::from_core)?;
    Ok(Json(budgets))
}

/// POST /api/budgets - Configure a category budget
///
/// Replaces any existing budget for the same category.
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.store.add_budget(new).map_err(AppError::from_core)?;
    Ok(Json(budget))
}
