use metrics_exporter_prometheus::PrometheusHandle;
use soriano::club::{
    ClubActivity, MissionError, MissionFacts, PolicyOwnership, ProfileCompleteness,
};
use soriano::coverage::{
    ExistingPolicies, PolicyType, ProfileRecord, ProfileRepository, RepositoryError, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<UserId, ProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn upsert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

/// Club bookkeeping the portal keeps next to the stored profiles.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemberActivity {
    pub(crate) completeness: ProfileCompleteness,
    pub(crate) pending_renewals: u32,
    pub(crate) open_claims: u32,
    pub(crate) activity: ClubActivity,
}

/// Mission facts backed by the profile store plus per-member club activity.
///
/// Policy holdings come from the stored coverage profile, and the risk
/// questionnaire counts as done once a profile has been saved.
#[derive(Clone)]
pub(crate) struct InMemoryMissionFacts {
    profiles: Arc<InMemoryProfileRepository>,
    members: Arc<Mutex<HashMap<UserId, MemberActivity>>>,
}

impl InMemoryMissionFacts {
    pub(crate) fn new(profiles: Arc<InMemoryProfileRepository>) -> Self {
        Self {
            profiles,
            members: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) fn record_activity(&self, user_id: UserId, activity: MemberActivity) {
        let mut guard = self.members.lock().expect("member mutex poisoned");
        guard.insert(user_id, activity);
    }

    fn member(&self, user_id: &UserId) -> MemberActivity {
        let guard = self.members.lock().expect("member mutex poisoned");
        guard.get(user_id).cloned().unwrap_or_default()
    }

    fn stored_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, MissionError> {
        self.profiles
            .fetch(user_id)
            .map_err(|err| MissionError::Unavailable(err.to_string()))
    }
}

impl MissionFacts for InMemoryMissionFacts {
    fn completeness(&self, user_id: &UserId) -> Result<ProfileCompleteness, MissionError> {
        let mut completeness = self.member(user_id).completeness;
        if self.stored_profile(user_id)?.is_some() {
            completeness.risk_questionnaire = true;
        }
        Ok(completeness)
    }

    fn ownership(&self, user_id: &UserId) -> Result<PolicyOwnership, MissionError> {
        let member = self.member(user_id);
        let held = self
            .stored_profile(user_id)?
            .map(|record| record.existing_policies)
            .unwrap_or_default();
        Ok(PolicyOwnership {
            held,
            pending_renewals: member.pending_renewals,
            open_claims: member.open_claims,
        })
    }

    fn activity(&self, user_id: &UserId) -> Result<ClubActivity, MissionError> {
        Ok(self.member(user_id).activity)
    }
}

/// Parses a comma-separated list of policy codes such as `VIDA,HOGAR`.
pub(crate) fn parse_policy_list(raw: &str) -> Result<ExistingPolicies, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            PolicyType::parse(code).ok_or_else(|| {
                let known: Vec<&str> = PolicyType::ALL.iter().map(|policy| policy.code()).collect();
                format!("unknown policy type '{code}' (expected one of {})", known.join(", "))
            })
        })
        .collect()
}
