//! HTTP behavior of the Soriano Club router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use soriano::club::{
    club_router, ClubActivity, ClubState, MissionError, MissionFacts, MissionGenerator,
    PolicyOwnership, PrizeWheel, ProfileCompleteness,
};
use soriano::coverage::UserId;
use tower::ServiceExt;

struct NewMemberFacts;

impl MissionFacts for NewMemberFacts {
    fn completeness(&self, _user_id: &UserId) -> Result<ProfileCompleteness, MissionError> {
        Ok(ProfileCompleteness::default())
    }

    fn ownership(&self, _user_id: &UserId) -> Result<PolicyOwnership, MissionError> {
        Ok(PolicyOwnership::default())
    }

    fn activity(&self, _user_id: &UserId) -> Result<ClubActivity, MissionError> {
        Ok(ClubActivity::default())
    }
}

struct OfflineFacts;

impl MissionFacts for OfflineFacts {
    fn completeness(&self, _user_id: &UserId) -> Result<ProfileCompleteness, MissionError> {
        Err(MissionError::Unavailable("crm offline".to_string()))
    }

    fn ownership(&self, _user_id: &UserId) -> Result<PolicyOwnership, MissionError> {
        Ok(PolicyOwnership::default())
    }

    fn activity(&self, _user_id: &UserId) -> Result<ClubActivity, MissionError> {
        Ok(ClubActivity::default())
    }
}

fn router<F: MissionFacts + 'static>(facts: F) -> axum::Router {
    club_router(ClubState {
        wheel: Arc::new(PrizeWheel::standard()),
        missions: Arc::new(MissionGenerator::new(Arc::new(facts))),
    })
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

#[tokio::test]
async fn wheel_endpoint_lists_normalized_prizes() {
    let response = router(NewMemberFacts)
        .oneshot(
            Request::get("/api/v1/club/wheel")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let prizes = read_json(response).await;
    let total: f64 = prizes
        .as_array()
        .expect("prize list")
        .iter()
        .filter_map(|prize| prize["probability"].as_f64())
        .sum();
    assert!((total - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn missions_endpoint_returns_priority_sorted_list() {
    let response = router(NewMemberFacts)
        .oneshot(
            Request::get("/api/v1/club/missions/cliente-3")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let missions = read_json(response).await;
    let missions = missions.as_array().expect("mission list");
    assert_eq!(missions[0]["id"], "risk-questionnaire");
    assert_eq!(missions[0]["priority"], "critical");
}

#[tokio::test]
async fn missions_endpoint_reports_unavailable_facts() {
    let response = router(OfflineFacts)
        .oneshot(
            Request::get("/api/v1/club/missions/cliente-3")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("crm offline"));
}
