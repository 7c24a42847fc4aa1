use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ExistingPolicies, PolicyType, UserId, UserProfile};

/// Raw profile data as persisted by the portal data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: UserId,
    pub profile: UserProfile,
    pub existing_policies: ExistingPolicies,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn view(&self) -> ProfileView {
        ProfileView {
            user_id: self.user_id.0.clone(),
            existing_policies: self.existing_policies.iter().collect(),
            profile: self.profile.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so the coverage service can be exercised in isolation.
pub trait ProfileRepository: Send + Sync {
    fn upsert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError>;
    fn fetch(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Shape returned to the dashboard after a profile is saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_id: String,
    pub existing_policies: Vec<PolicyType>,
    pub profile: UserProfile,
    pub updated_at: DateTime<Utc>,
}
