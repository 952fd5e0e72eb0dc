//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use spendsight_core::ai::{AiClient, AiService};
use tower::ServiceExt;

/// App with no collaborator configured; every AI-shaped call degrades to
/// the rule-based path with no network involved.
fn setup_test_app() -> Router {
    let store = ExpenseStore::in_memory();
    create_router_with_options(store, ServerConfig::default(), AiService::new(None))
}

/// App with the mock collaborator wired in.
fn setup_test_app_with_mock() -> Router {
    let store = ExpenseStore::in_memory();
    create_router_with_options(
        store,
        ServerConfig::default(),
        AiService::new(Some(AiClient::mock())),
    )
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn today_str() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_list_expenses_empty() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/expenses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_and_list_expense() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Office Lunch",
        "amount": 250.0,
        "date": "2025-03-10",
        "category": "Food"
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/expenses", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Office Lunch");
    assert_eq!(json["amount"], 250.0);
    assert_eq!(json["category"], "Food");
    assert!(json["id"].as_str().is_some());
    // Category was supplied by the caller, so no source annotation
    assert!(json.get("category_source").is_none());

    let response = app.oneshot(get("/api/expenses")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_expense_invalid_amount() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Bad record",
        "amount": -5.0,
        "date": "2025-03-10"
    });
    let response = app.oneshot(post_json("/api/expenses", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_create_expense_invalid_date() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Bad date",
        "amount": 10.0,
        "date": "10-03-2025"
    });
    let response = app.oneshot(post_json("/api/expenses", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_expense_blank_category_categorized() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Morning Coffee",
        "amount": 120.0,
        "date": "2025-03-10"
    });
    let response = app.oneshot(post_json("/api/expenses", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Food");
    // No collaborator configured, so the rules filled it in
    assert_eq!(json["category_source"], "fallback");
}

#[tokio::test]
async fn test_delete_expense() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "name": "Bus Fare",
        "amount": 50.0,
        "date": "2025-03-10",
        "category": "Transportation"
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/expenses", body))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let id = json["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);

    // Deleting again is a 404
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_create_budget_replaces_category() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/budgets",
            serde_json::json!({ "category": "Food", "amount": 500.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/budgets",
            serde_json::json!({ "category": "Food", "amount": 800.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/budgets")).await.unwrap();
    let json = get_body_json(response).await;
    let budgets = json.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["amount"], 800.0);
    assert_eq!(budgets[0]["period"], "monthly");
}

#[tokio::test]
async fn test_budget_alert_danger() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json(
            "/api/budgets",
            serde_json::json!({ "category": "Food", "amount": 100.0 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Dinner",
                "amount": 200.0,
                "date": today_str(),
                "category": "Food"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/budget/alerts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["category"], "Food");
    assert_eq!(alerts[0]["alert_type"], "danger");
    assert_eq!(alerts[0]["percentage_used"], 200.0);
}

#[tokio::test]
async fn test_budget_alerts_empty_under_threshold() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json(
            "/api/budgets",
            serde_json::json!({ "category": "Food", "amount": 1000.0 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Snack",
                "amount": 50.0,
                "date": today_str(),
                "category": "Food"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/budget/alerts")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

// ========== Salary API Tests ==========

#[tokio::test]
async fn test_set_and_get_salary() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/salary",
            serde_json::json!({ "monthly": 50000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/salary")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["monthly"], 50000.0);
    assert_eq!(json["currency"], "INR");
}

#[tokio::test]
async fn test_set_salary_negative_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/salary",
            serde_json::json!({ "monthly": -100.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Analytics API Tests ==========

#[tokio::test]
async fn test_analytics_empty_store() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/expenses/analytics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total_expenses"], 0.0);
    assert_eq!(json["average_daily_spend"], 0.0);
    assert_eq!(json["highest_spending_category"], "");
    assert_eq!(json["spending_growth"], 0.0);
    // Trend is always six calendar months, zero-filled
    let trend = json["monthly_trend"].as_array().unwrap();
    assert_eq!(trend.len(), 6);
    assert!(trend.iter().all(|b| b["total"] == 0.0));
}

#[tokio::test]
async fn test_analytics_with_expenses() {
    let app = setup_test_app();

    for (name, amount) in [("Lunch", 200.0), ("Dinner", 300.0)] {
        app.clone()
            .oneshot(post_json(
                "/api/expenses",
                serde_json::json!({
                    "name": name,
                    "amount": amount,
                    "date": today_str(),
                    "category": "Food"
                }),
            ))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/api/expenses/analytics")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["total_expenses"], 500.0);
    assert_eq!(json["category_breakdown"]["Food"], 500.0);
    assert_eq!(json["highest_spending_category"], "Food");
    // Both expenses share one date, so the daily average is the full total
    assert_eq!(json["average_daily_spend"], 500.0);
}

#[tokio::test]
async fn test_predict_month() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Groceries run",
                "amount": 300.0,
                "date": today_str(),
                "category": "Groceries"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/expenses/predict-month"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["current_spent"], 300.0);
    assert!(json["predicted_total"].as_f64().unwrap() >= 300.0);
    assert!(json["confidence"].as_f64().unwrap() > 0.0);
    assert!(json["days_elapsed"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_predict_month_empty() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/expenses/predict-month"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["predicted_total"], 0.0);
    assert_eq!(json["confidence"], 0.0);
}

#[tokio::test]
async fn test_dashboard_assembles_all_sections() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json(
            "/api/salary",
            serde_json::json!({ "monthly": 50000.0 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Lunch",
                "amount": 200.0,
                "date": today_str(),
                "category": "Food"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["analytics"]["total_expenses"], 200.0);
    assert_eq!(json["prediction"]["current_spent"], 200.0);
    assert_eq!(json["alerts"].as_array().unwrap().len(), 0);
    assert_eq!(json["health"]["score"], 90.0);
}

// ========== Financial Health API Tests ==========

#[tokio::test]
async fn test_financial_health_score() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json(
            "/api/salary",
            serde_json::json!({ "monthly": 50000.0 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Rent",
                "amount": 20000.0,
                "date": today_str(),
                "category": "Housing"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/financial-health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 40% of income spent: top band
    let json = get_body_json(response).await;
    assert_eq!(json["score"], 90.0);
    assert_eq!(json["grade"], "A");
    assert_eq!(json["spending_ratio"], 40.0);
    assert_eq!(json["source"], "deterministic");
}

#[tokio::test]
async fn test_financial_health_no_salary() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/financial-health")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["score"], 50.0);
    assert_eq!(json["spending_ratio"], 0.0);
}

#[tokio::test]
async fn test_financial_health_collaborator_enrichment() {
    let app = setup_test_app_with_mock();

    let response = app.oneshot(get("/api/financial-health")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["source"], "collaborator");
    assert_eq!(json["collaborator_score"], 72.0);
    // Baseline score is still the deterministic one
    assert_eq!(json["score"], 50.0);
}

// ========== AI API Tests ==========

#[tokio::test]
async fn test_categorize_endpoint() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/expenses/categorize?expense_name=bus%20fare&amount=50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Transportation");
    assert_eq!(json["source"], "fallback");
}

#[tokio::test]
async fn test_categorize_empty_name_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/expenses/categorize?expense_name=%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insights_fallback() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Lunch",
                "amount": 200.0,
                "date": today_str(),
                "category": "Food"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/expenses/insights")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["fallback_reason"], "not_configured");
    assert!(!json["insights"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_insights_from_mock_collaborator() {
    let app = setup_test_app_with_mock();

    app.clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({
                "name": "Lunch",
                "amount": 200.0,
                "date": today_str(),
                "category": "Food"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/expenses/insights")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["source"], "collaborator");
    assert!(json.get("fallback_reason").is_none());
}

// ========== Service Health Tests ==========

#[tokio::test]
async fn test_service_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["collaborator_configured"], false);
    assert_eq!(json["collaborator_available"], false);
}

#[tokio::test]
async fn test_service_health_with_mock() {
    let app = setup_test_app_with_mock();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["collaborator_configured"], true);
    assert_eq!(json["collaborator_available"], true);
}
