use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use soriano::club::{club_router, ClubState, MissionFacts};
use soriano::coverage::{coverage_router, CoverageService, ProfileRepository};
use std::sync::Arc;

/// Merges the coverage and club routers with the operational endpoints.
pub(crate) fn with_portal_routes<R, F>(
    coverage: Arc<CoverageService<R>>,
    club: ClubState<F>,
) -> axum::Router
where
    R: ProfileRepository + 'static,
    F: MissionFacts + 'static,
{
    coverage_router(coverage)
        .merge(club_router(club))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryMissionFacts, InMemoryProfileRepository};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use soriano::club::{MissionGenerator, PrizeWheel};
    use soriano::coverage::AnalyzerConfig;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn portal_app(ready: bool) -> axum::Router {
        let profiles = Arc::new(InMemoryProfileRepository::default());
        let coverage = Arc::new(CoverageService::new(
            profiles.clone(),
            AnalyzerConfig::default(),
        ));
        let club = ClubState {
            wheel: Arc::new(PrizeWheel::standard()),
            missions: Arc::new(MissionGenerator::new(Arc::new(InMemoryMissionFacts::new(
                profiles,
            )))),
        };
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_portal_routes(coverage, club).layer(Extension(state))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let app = portal_app(false);

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("health response");
        assert_eq!(health.status(), StatusCode::OK);

        let ready = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("ready response");
        assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(ready).await["status"], "initializing");
    }

    #[tokio::test]
    async fn stored_profile_feeds_analysis_and_missions() {
        let app = portal_app(true);

        let store = Request::builder()
            .method(Method::PUT)
            .uri("/api/v1/coverage/profiles/cliente-7")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "profile": { "hasMortgage": true, "hasDependents": true },
                    "existingPolicyTypes": ["HOGAR"],
                })
                .to_string(),
            ))
            .expect("request");
        let response = app.clone().oneshot(store).await.expect("store response");
        assert_eq!(response.status(), StatusCode::OK);

        let analysis = app
            .clone()
            .oneshot(
                Request::get("/api/v1/coverage/profiles/cliente-7/analysis")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("analysis response");
        assert_eq!(analysis.status(), StatusCode::OK);
        let analysis = json_body(analysis).await;
        assert_eq!(analysis["missingPolicies"][0]["policyType"], "VIDA");

        let missions = app
            .oneshot(
                Request::get("/api/v1/club/missions/cliente-7")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("missions response");
        assert_eq!(missions.status(), StatusCode::OK);
        let missions = json_body(missions).await;
        let ids: Vec<&str> = missions
            .as_array()
            .expect("mission list")
            .iter()
            .filter_map(|mission| mission["id"].as_str())
            .collect();
        assert!(ids.contains(&"second-policy"));
        assert!(ids.contains(&"protect-mortgage"));
        assert!(!ids.contains(&"risk-questionnaire"));
    }

    #[tokio::test]
    async fn wheel_spin_returns_a_listed_prize() {
        let app = portal_app(true);

        let spin = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/club/wheel/spin")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("spin response");
        assert_eq!(spin.status(), StatusCode::OK);

        let body = json_body(spin).await;
        let id = body["prize"]["id"].as_str().expect("prize id");
        assert!(PrizeWheel::standard()
            .prizes()
            .iter()
            .any(|prize| prize.id == id));
    }
}
