//! Salary handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use spendsight_core::models::Salary;

/// GET /api/salary - Current monthly income figure
pub async fn get_salary(State(state): State<Arc<AppState>>) -> Result<Json<Salary>, AppError> {
    let salary = state.store.salary().map_err(AppError::from_core)?;
    Ok(Json(salary))
}

/// Salary update form; currency defaults when omitted
#[derive(Debug, Deserialize)]
pub struct SalaryForm {
    pub monthly: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    Salary::default().currency
}

/// POST /api/salary - Set the monthly income figure
pub async fn set_salary(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SalaryForm>,
) -> Result<Json<Salary>, AppError> {
    let salary = state
        .store
        .set_salary(Salary {
            monthly: form.monthly,
            currency: form.currency,
        })
        .map_err(AppError::from_core)?;
    Ok(Json(salary))
}
