use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{CreditAttributes, FarmerId};
use super::service::{CreditAnalysisService, CreditServiceError};

/// Router builder exposing the analyze and read endpoints.
pub fn credit_router(service: Arc<CreditAnalysisService>) -> Router {
    Router::new()
        .route(
            "/api/v1/farmers/:farmer_id/credit/analyze",
            post(analyze_handler),
        )
        .route(
            "/api/v1/farmers/:farmer_id/credit/evaluations",
            get(evaluation_history_handler),
        )
        .route(
            "/api/v1/farmers/:farmer_id/credit/evaluations/latest",
            get(latest_evaluation_handler),
        )
        .route(
            "/api/v1/farmers/:farmer_id/dashboard",
            get(dashboard_handler),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<CreditAnalysisService>>,
    Path(farmer_id): Path<String>,
    axum::Json(attributes): axum::Json<CreditAttributes>,
) -> Response {
    match service.analyze(FarmerId(farmer_id), attributes).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(CreditServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "issues": error.issues,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

const HISTORY_WINDOW: usize = 20;

pub(crate) async fn evaluation_history_handler(
    State(service): State<Arc<CreditAnalysisService>>,
    Path(farmer_id): Path<String>,
) -> Response {
    let id = FarmerId(farmer_id);
    match service.evaluation_history(&id, HISTORY_WINDOW) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn latest_evaluation_handler(
    State(service): State<Arc<CreditAnalysisService>>,
    Path(farmer_id): Path<String>,
) -> Response {
    let id = FarmerId(farmer_id);
    match service.latest_evaluation(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn dashboard_handler(
    State(service): State<Arc<CreditAnalysisService>>,
    Path(farmer_id): Path<String>,
) -> Response {
    let id = FarmerId(farmer_id);
    match service.dashboard(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
