//! Spendsight Web Server
//!
//! Axum-based REST API for the Spendsight expense tracker. The HTTP layer
//! stays thin: handlers validate input, take a store snapshot, and delegate
//! to the analytics engine or the AI collaborator facade.
//!
//! There is no authentication; this server is meant to run on a trusted
//! local network behind whatever front door the deployment provides.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use spendsight_core::ai::AiService;
use spendsight_core::analytics::AnalyticsEngine;
use spendsight_core::store::ExpenseStore;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub store: ExpenseStore,
    pub engine: AnalyticsEngine,
    pub ai: AiService,
    pub config: ServerConfig,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router, wiring the collaborator from environment.
pub fn create_router(store: ExpenseStore, config: ServerConfig) -> Router {
    let ai = AiService::from_env();
    if ai.configured() {
        info!("AI collaborator configured: {}", ai.describe());
    } else {
        info!("AI collaborator not configured (set GEMINI_API_KEY to enable); using rule-based analysis");
    }
    create_router_with_options(store, config, ai)
}

/// Create the application router with an explicit collaborator (for testing).
pub fn create_router_with_options(
    store: ExpenseStore,
    config: ServerConfig,
    ai: AiService,
) -> Router {
    let state = Arc::new(AppState {
        store,
        engine: AnalyticsEngine::new(),
        ai,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/analytics", get(handlers::get_analytics))
        .route("/expenses/predict-month", get(handlers::predict_month))
        .route("/expenses/categorize", get(handlers::categorize_expense))
        .route("/expenses/insights", get(handlers::get_insights))
        .route("/expenses/:id", delete(handlers::delete_expense))
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route("/budget/alerts", get(handlers::get_budget_alerts))
        // Salary
        .route(
            "/salary",
            get(handlers::get_salary).post(handlers::set_salary),
        )
        // Health
        .route("/financial-health", get(handlers::get_financial_health))
        .route("/health", get(handlers::service_health));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(
    store: ExpenseStore,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(store, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error onto the right status code.
    ///
    /// Validation failures are the caller's fault and carry their message;
    /// everything else is sanitized to a generic 500.
    pub fn from_core(err: spendsight_core::Error) -> Self {
        use spendsight_core::Error as CoreError;
        match err {
            CoreError::Validation(msg) => Self::bad_request(&msg),
            CoreError::NotFound(msg) => Self::not_found(&msg),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }
        if self.status == StatusCode::BAD_REQUEST {
            warn!(message = %self.message, "Rejected request");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
