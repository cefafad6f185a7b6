use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::BoundingBox;
use super::service::{AllocationRequest, TriageError, TriageService};
use super::source::DefectSource;

/// Router builder exposing allocation, defect lookup, and analytics endpoints.
pub fn triage_router<S>(service: Arc<TriageService<S>>) -> Router
where
    S: DefectSource + 'static,
{
    Router::new()
        .route("/api/v1/budget/allocate", post(allocate_handler::<S>))
        .route("/api/v1/defects", post(defects_handler::<S>))
        .route("/api/v1/defects/:defect_id", get(defect_handler::<S>))
        .route("/api/v1/analytics", get(analytics_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DefectQuery {
    #[serde(default)]
    pub(crate) bounds: Option<BoundingBox>,
}

pub(crate) async fn allocate_handler<S>(
    State(service): State<Arc<TriageService<S>>>,
    Json(request): Json<AllocationRequest>,
) -> Response
where
    S: DefectSource + 'static,
{
    match service.recommend(request) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn defects_handler<S>(
    State(service): State<Arc<TriageService<S>>>,
    Json(query): Json<DefectQuery>,
) -> Response
where
    S: DefectSource + 'static,
{
    match service.defects(query.bounds) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn defect_handler<S>(
    State(service): State<Arc<TriageService<S>>>,
    Path(defect_id): Path<String>,
) -> Response
where
    S: DefectSource + 'static,
{
    match service.defect(&defect_id) {
        Ok(scored) => (StatusCode::OK, Json(scored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analytics_handler<S>(State(service): State<Arc<TriageService<S>>>) -> Response
where
    S: DefectSource + 'static,
{
    match service.analytics() {
        Ok(analytics) => (StatusCode::OK, Json(analytics)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &TriageError) -> StatusCode {
    match error {
        TriageError::InvalidConfig(_)
        | TriageError::Allocation(_)
        | TriageError::InvalidDefect(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TriageError::NotFound(_) => StatusCode::NOT_FOUND,
        TriageError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: TriageError) -> Response {
    let status = status_for(&error);
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
