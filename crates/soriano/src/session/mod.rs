//! Explicit portal session state.
//!
//! Only identity and session fields survive a reload. Cached domain data such
//! as analyses or missions is rebuilt from the services after hydration, so a
//! stale snapshot can never resurrect old business data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::club::Mission;
use crate::coverage::{CoverageAnalysis, UserId};

/// Snapshot version written by [`SessionStore::persist`].
const SNAPSHOT_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalRole {
    Customer,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: PortalRole,
}

/// Allow-listed fields; nothing else is ever written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    version: u8,
    identity: SessionIdentity,
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no authenticated session to persist")]
    NotAuthenticated,
    #[error("session snapshot could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    identity: Option<SessionIdentity>,
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    analysis: Option<CoverageAnalysis>,
    missions: Vec<Mission>,
}

impl SessionStore {
    /// Hydrates from a stored snapshot. Corrupt, outdated or expired snapshots
    /// yield a fresh anonymous session.
    pub fn initialize(persisted: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(raw) = persisted else {
            return Self::default();
        };

        match serde_json::from_str::<PersistedSession>(raw) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION && snapshot.expires_at > now => {
                Self {
                    identity: Some(snapshot.identity),
                    token: Some(snapshot.token),
                    expires_at: Some(snapshot.expires_at),
                    ..Self::default()
                }
            }
            Ok(_) => {
                tracing::debug!("discarding expired or outdated session snapshot");
                Self::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable session snapshot");
                Self::default()
            }
        }
    }

    pub fn sign_in(
        &mut self,
        identity: SessionIdentity,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) {
        self.teardown();
        self.identity = Some(identity);
        self.token = Some(token.into());
        self.expires_at = Some(expires_at);
    }

    /// Serializes the allow-listed identity/session fields only.
    pub fn persist(&self) -> Result<String, SessionError> {
        let (Some(identity), Some(token), Some(expires_at)) =
            (&self.identity, &self.token, self.expires_at)
        else {
            return Err(SessionError::NotAuthenticated);
        };

        let snapshot = PersistedSession {
            version: SNAPSHOT_VERSION,
            identity: identity.clone(),
            token: token.clone(),
            expires_at,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Clears identity, token and every cached domain value.
    pub fn teardown(&mut self) {
        *self = Self::default();
    }

    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.identity.is_some()
            && self.token.is_some()
            && self.expires_at.map(|expiry| expiry > now).unwrap_or(false)
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn cache_analysis(&mut self, analysis: CoverageAnalysis) {
        self.analysis = Some(analysis);
    }

    pub fn analysis(&self) -> Option<&CoverageAnalysis> {
        self.analysis.as_ref()
    }

    pub fn cache_missions(&mut self, missions: Vec<Mission>) {
        self.missions = missions;
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageAnalyzer, ExistingPolicies, UserProfile};
    use chrono::{Duration, TimeZone};
    use serde_json::Value;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn identity() -> SessionIdentity {
        SessionIdentity {
            user_id: UserId("cliente-42".to_string()),
            display_name: "Lucía Soriano".to_string(),
            email: "lucia@example.com".to_string(),
            role: PortalRole::Customer,
        }
    }

    fn signed_in_store() -> SessionStore {
        let mut store = SessionStore::default();
        store.sign_in(identity(), "tok-123", now() + Duration::hours(8));
        store.cache_analysis(
            CoverageAnalyzer::default().analyze(&UserProfile::default(), &ExistingPolicies::new()),
        );
        store
    }

    #[test]
    fn persist_writes_only_allow_listed_fields() {
        let raw = signed_in_store().persist().expect("authenticated session persists");
        let value: Value = serde_json::from_str(&raw).expect("valid json");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object snapshot")
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(keys.len(), 4);
        for key in ["version", "identity", "token", "expiresAt"] {
            assert!(keys.contains(&key), "{key} persisted");
        }
        assert!(!raw.contains("overallScore"));
        assert_eq!(value["identity"]["displayName"], "Lucía Soriano");
    }

    #[test]
    fn initialize_restores_identity_without_domain_data() {
        let raw = signed_in_store().persist().expect("persists");

        let restored = SessionStore::initialize(Some(&raw), now());

        assert!(restored.is_authenticated(now()));
        assert_eq!(restored.identity(), Some(&identity()));
        assert_eq!(restored.token(), Some("tok-123"));
        assert!(restored.analysis().is_none());
        assert!(restored.missions().is_empty());
    }

    #[test]
    fn initialize_discards_expired_or_corrupt_snapshots() {
        let raw = signed_in_store().persist().expect("persists");

        let later = now() + Duration::hours(9);
        assert!(!SessionStore::initialize(Some(&raw), later).is_authenticated(later));
        assert!(SessionStore::initialize(Some("{not json"), now())
            .identity()
            .is_none());
        assert!(SessionStore::initialize(None, now()).identity().is_none());
    }

    #[test]
    fn initialize_discards_unknown_snapshot_versions() {
        let raw = signed_in_store().persist().expect("persists");
        assert!(raw.contains("\"version\":1"));
        let future = raw.replace("\"version\":1", "\"version\":2");

        let restored = SessionStore::initialize(Some(&future), now());

        assert!(!restored.is_authenticated(now()));
        assert!(restored.identity().is_none());
        assert!(restored.token().is_none());
    }

    #[test]
    fn sign_in_replaces_previous_session_data() {
        let mut store = signed_in_store();
        assert!(store.analysis().is_some());

        let colleague = SessionIdentity {
            user_id: UserId("empleado-3".to_string()),
            display_name: "Marta Gil".to_string(),
            email: "marta@example.com".to_string(),
            role: PortalRole::Employee,
        };
        store.sign_in(colleague.clone(), "tok-456", now() + Duration::hours(1));

        assert!(store.analysis().is_none());
        assert!(store.missions().is_empty());
        assert_eq!(store.identity(), Some(&colleague));
        assert_eq!(store.token(), Some("tok-456"));
    }

    #[test]
    fn teardown_clears_everything() {
        let mut store = signed_in_store();
        store.teardown();

        assert!(!store.is_authenticated(now()));
        assert!(store.analysis().is_none());
        assert!(matches!(store.persist(), Err(SessionError::NotAuthenticated)));
    }
}
