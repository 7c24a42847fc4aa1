use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::missions::{MissionError, MissionFacts, MissionGenerator};
use super::wheel::{PrizeWheel, WheelPrize};
use crate::coverage::UserId;

/// Shared handles for the club endpoints.
pub struct ClubState<F> {
    pub wheel: Arc<PrizeWheel>,
    pub missions: Arc<MissionGenerator<F>>,
}

impl<F> Clone for ClubState<F> {
    fn clone(&self) -> Self {
        Self {
            wheel: self.wheel.clone(),
            missions: self.missions.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpinResult {
    pub prize: WheelPrize,
    pub spun_at: DateTime<Utc>,
}

/// Router builder exposing the Soriano Club wheel and missions.
pub fn club_router<F>(state: ClubState<F>) -> Router
where
    F: MissionFacts + 'static,
{
    Router::new()
        .route("/api/v1/club/wheel", get(wheel_handler::<F>))
        .route("/api/v1/club/wheel/spin", post(spin_handler::<F>))
        .route("/api/v1/club/missions/:user_id", get(missions_handler::<F>))
        .with_state(state)
}

pub(crate) async fn wheel_handler<F>(State(state): State<ClubState<F>>) -> Response
where
    F: MissionFacts + 'static,
{
    (StatusCode::OK, axum::Json(state.wheel.prizes().to_vec())).into_response()
}

pub(crate) async fn spin_handler<F>(State(state): State<ClubState<F>>) -> Response
where
    F: MissionFacts + 'static,
{
    let drawn = {
        let mut rng = rand::thread_rng();
        state.wheel.spin(&mut rng).cloned()
    };

    match drawn {
        Ok(prize) => {
            tracing::info!(prize = %prize.id, "wheel spun");
            let result = SpinResult {
                prize,
                spun_at: Utc::now(),
            };
            (StatusCode::OK, axum::Json(result)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn missions_handler<F>(
    State(state): State<ClubState<F>>,
    Path(user_id): Path<String>,
) -> Response
where
    F: MissionFacts + 'static,
{
    match state.missions.generate(&UserId(user_id)) {
        Ok(missions) => (StatusCode::OK, axum::Json(missions)).into_response(),
        Err(MissionError::Unavailable(detail)) => {
            let payload = json!({ "error": format!("mission facts unavailable: {detail}") });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
