use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};

use super::domain::UserId;
use super::repository::{ProfileRepository, RepositoryError};
use super::service::{CoverageService, CoverageServiceError};

/// Router builder exposing the coverage analysis endpoints.
pub fn coverage_router<R>(service: Arc<CoverageService<R>>) -> Router
where
    R: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/coverage/analysis", post(analysis_handler::<R>))
        .route(
            "/api/v1/coverage/profiles/:user_id",
            put(store_profile_handler::<R>),
        )
        .route(
            "/api/v1/coverage/profiles/:user_id/analysis",
            get(stored_analysis_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn analysis_handler<R>(
    State(service): State<Arc<CoverageService<R>>>,
    axum::Json(body): axum::Json<Value>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.analyze(&body) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn store_profile_handler<R>(
    State(service): State<Arc<CoverageService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.store_profile(UserId(user_id), &body) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stored_analysis_handler<R>(
    State(service): State<Arc<CoverageService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    let id = UserId(user_id);
    match service.analyze_stored(&id) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(CoverageServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "no coverage profile stored for user",
                "user_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: CoverageServiceError) -> Response {
    let status = match &error {
        CoverageServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CoverageServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CoverageServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
