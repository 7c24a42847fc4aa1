use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::coverage::analysis::{AnalyzerConfig, CoverageAnalyzer};
use crate::coverage::domain::{ExistingPolicies, PolicyType, UserId, UserProfile};
use crate::coverage::repository::{ProfileRecord, ProfileRepository, RepositoryError};
use crate::coverage::{coverage_router, CoverageService};

pub(super) fn analyzer() -> CoverageAnalyzer {
    CoverageAnalyzer::new(AnalyzerConfig::default())
}

pub(super) fn mortgaged_family() -> UserProfile {
    UserProfile {
        has_mortgage: Some(true),
        has_vehicle: Some(false),
        has_dependents: Some(true),
        ..UserProfile::default()
    }
}

/// Self-employed homeowner with a car, a dog, kids and frequent trips.
pub(super) fn busy_household() -> UserProfile {
    UserProfile {
        age: Some(44),
        marital_status: Some(crate::coverage::MaritalStatus::Married),
        dependents: Some(2),
        employment_status: Some(crate::coverage::EmploymentStatus::SelfEmployed),
        housing_status: Some(crate::coverage::HousingStatus::Mortgaged),
        mortgage_amount: Some(180_000),
        vehicle_value: Some(22_000),
        travel_frequency: Some(crate::coverage::TravelFrequency::Frequent),
        pets: Some(1),
        ..UserProfile::default()
    }
}

pub(super) fn holdings(policies: &[PolicyType]) -> ExistingPolicies {
    policies.iter().copied().collect()
}

pub(super) fn every_policy() -> ExistingPolicies {
    PolicyType::ALL.into_iter().collect()
}

pub(super) fn analysis_body() -> Value {
    json!({
        "profile": {
            "hasMortgage": true,
            "hasDependents": true,
            "hasVehicle": true,
        },
        "existingPolicyTypes": ["AUTO"],
    })
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<UserId, ProfileRecord>>,
}

impl ProfileRepository for MemoryRepository {
    fn upsert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(user_id).cloned())
    }
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn upsert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _user_id: &UserId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (CoverageService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CoverageService::new(repository.clone(), AnalyzerConfig::default());
    (service, repository)
}

pub(super) fn coverage_router_with_service(
    service: CoverageService<MemoryRepository>,
) -> axum::Router {
    coverage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
