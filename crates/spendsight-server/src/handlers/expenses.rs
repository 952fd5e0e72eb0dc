//! Expense CRUD, categorization, and insight handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, SuccessResponse};
use spendsight_core::ai::types::ExpenseSummary;
use spendsight_core::ai::{Provenance, SpendingInsight};
use spendsight_core::models::{Expense, NewExpense};

/// GET /api/expenses - List all expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.store.list_expenses().map_err(AppError::from_core)?;
    Ok(Json(expenses))
}

/// Response for expense creation; `category_source` only appears when the
/// category was filled in by the collaborator or its fallback
#[derive(Serialize)]
pub struct CreateExpenseResponse {
    #[serde(flatten)]
    pub expense: Expense,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_source: Option<&'static str>,
}

/// POST /api/expenses - Record a new expense
///
/// When the request omits the category, the collaborator suggests one
/// (degrading to keyword rules when it is unavailable).
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(mut new): Json<NewExpense>,
) -> Result<Json<CreateExpenseResponse>, AppError> {
    let mut category_source = None;
    if new.category.trim().is_empty() {
        let (category, provenance) = state.ai.categorize(&new.name, new.amount).await;
        info!(name = %new.name, category = %category, source = provenance.as_str(), "Categorized expense");
        new.category = category;
        category_source = Some(provenance.as_str());
    }

    let expense = state.store.add_expense(new).map_err(AppError::from_core)?;
    Ok(Json(CreateExpenseResponse {
        expense,
        category_source,
    }))
}

/// DELETE /api/expenses/:id - Remove an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let removed = state.store.delete_expense(&id).map_err(AppError::from_core)?;
    if !removed {
        return Err(AppError::not_found("Expense not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// Query parameters for the categorization endpoint
#[derive(Debug, Deserialize)]
pub struct CategorizeQuery {
    pub expense_name: String,
    #[serde(default)]
    pub amount: f64,
}

/// Category suggestion with its provenance
#[derive(Serialize)]
pub struct CategorizeResponse {
    pub category: String,
    pub source: &'static str,
}

/// GET /api/expenses/categorize - Suggest a category for an expense name
pub async fn categorize_expense(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategorizeQuery>,
) -> Result<Json<CategorizeResponse>, AppError> {
    if params.expense_name.trim().is_empty() {
        return Err(AppError::bad_request("expense_name must not be empty"));
    }

    let (category, provenance) = state
        .ai
        .categorize(&params.expense_name, params.amount)
        .await;
    Ok(Json(CategorizeResponse {
        category,
        source: provenance.as_str(),
    }))
}

/// Insight list with its provenance
#[derive(Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<SpendingInsight>,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<spendsight_core::ai::FallbackReason>,
}

/// GET /api/expenses/insights - Spending insights over all recorded expenses
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InsightsResponse>, AppError> {
    let expenses = state.store.list_expenses().map_err(AppError::from_core)?;
    let summary = ExpenseSummary::from_records(&expenses);

    let (insights, provenance) = state.ai.insights(&summary).await;
    let fallback_reason = match provenance {
        Provenance::Collaborator => None,
        Provenance::Fallback(reason) => Some(reason),
    };

    Ok(Json(InsightsResponse {
        insights,
        source: provenance.as_str(),
        fallback_reason,
    }))
}
