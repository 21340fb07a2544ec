use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::credit::domain::CreditAttributes;
use crate::workflows::credit::router::{self, credit_router};

#[tokio::test]
async fn analyze_handler_rejects_invalid_attributes_with_field_issues() {
    let harness = harness();

    let response = router::analyze_handler(
        State(harness.service.clone()),
        Path("farmer-042".to_string()),
        axum::Json(CreditAttributes::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    let issues = payload
        .get("issues")
        .and_then(Value::as_array)
        .expect("issues listed");
    assert_eq!(issues.len(), 3);
}

#[tokio::test]
async fn analyze_route_returns_full_outcome() {
    let harness = harness();
    let router = credit_router(harness.service.clone());

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/farmers/farmer-042/credit/analyze")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&strong_attributes()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("score").and_then(Value::as_u64).unwrap_or(0) >= 650);
    assert_eq!(
        payload
            .get("eligible_schemes")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(6)
    );
}

#[tokio::test]
async fn history_route_lists_runs_newest_first() {
    let harness = harness();
    harness
        .service
        .analyze(farmer(), strong_attributes())
        .await
        .expect("first run");
    let weaker = CreditAttributes {
        repayment_history: Some("poor".to_string()),
        ..strong_attributes()
    };
    harness
        .service
        .analyze(farmer(), weaker)
        .await
        .expect("second run");

    let router = credit_router(harness.service.clone());
    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/farmers/farmer-042/credit/evaluations")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let records = payload.as_array().expect("record list");
    assert_eq!(records.len(), 2);
    let newest = records[0].get("score").and_then(Value::as_u64).unwrap();
    let oldest = records[1].get("score").and_then(Value::as_u64).unwrap();
    assert!(newest < oldest, "poor repayment run comes first");
}

#[tokio::test]
async fn latest_route_returns_null_before_any_evaluation() {
    let harness = harness();
    let router = credit_router(harness.service.clone());

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/farmers/farmer-042/credit/evaluations/latest")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.is_null());
}

#[tokio::test]
async fn dashboard_route_serves_defaults_for_unknown_farmers() {
    let harness = harness();
    let router = credit_router(harness.service.clone());

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/farmers/nobody/dashboard")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("credit_score").and_then(Value::as_u64), Some(0));
    assert_eq!(
        payload.get("score_band").and_then(Value::as_str),
        Some("Not Available")
    );
    assert_eq!(
        payload
            .get("eligible_schemes")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(0)
    );
}

#[tokio::test]
async fn dashboard_route_reflects_completed_analysis() {
    let harness = harness();
    harness
        .service
        .analyze(farmer(), strong_attributes())
        .await
        .expect("analysis succeeds");

    let router = credit_router(harness.service.clone());
    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/farmers/farmer-042/dashboard")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("profile").map(|p| !p.is_null()).unwrap_or(false));
    assert_eq!(
        payload
            .get("eligible_schemes")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(3)
    );
    assert_eq!(
        payload
            .get("recent_activity")
            .and_then(Value::as_array)
            .map(|entries| !entries.is_empty()),
        Some(true)
    );
}
