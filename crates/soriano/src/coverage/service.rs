use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use super::analysis::{AnalyzerConfig, CoverageAnalysis, CoverageAnalyzer};
use super::domain::{ExistingPolicies, InvalidInputError, UserId, UserProfile};
use super::repository::{ProfileRecord, ProfileRepository, RepositoryError};

/// Service composing the analyzer with the profile repository.
pub struct CoverageService<R> {
    repository: Arc<R>,
    analyzer: Arc<CoverageAnalyzer>,
}

impl<R> CoverageService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AnalyzerConfig) -> Self {
        Self {
            repository,
            analyzer: Arc::new(CoverageAnalyzer::new(config)),
        }
    }

    /// Analyze an ad-hoc `{ profile, existingPolicyTypes }` payload without storing it.
    pub fn analyze(&self, body: &Value) -> Result<CoverageAnalysis, CoverageServiceError> {
        let (profile, existing) = parse_request(body)?;
        let analysis = self.analyzer.analyze(&profile, &existing);
        debug!(
            score = analysis.overall_score,
            missing = analysis.missing_policies.len(),
            "ad-hoc coverage analysis"
        );
        Ok(analysis)
    }

    /// Persist the raw profile and holdings for later analyses.
    pub fn store_profile(
        &self,
        user_id: UserId,
        body: &Value,
    ) -> Result<ProfileRecord, CoverageServiceError> {
        let (profile, existing_policies) = parse_request(body)?;
        let record = ProfileRecord {
            user_id,
            profile,
            existing_policies,
            updated_at: Utc::now(),
        };

        let stored = self.repository.upsert(record)?;
        info!(user = %stored.user_id.0, "coverage profile stored");
        Ok(stored)
    }

    /// Re-read the stored profile and analyze it; nothing derived is cached.
    pub fn analyze_stored(
        &self,
        user_id: &UserId,
    ) -> Result<CoverageAnalysis, CoverageServiceError> {
        let record = self
            .repository
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;

        let analysis = self
            .analyzer
            .analyze(&record.profile, &record.existing_policies);
        info!(
            user = %user_id.0,
            score = analysis.overall_score,
            risk = analysis.risk_level.label(),
            "stored coverage analysis"
        );
        Ok(analysis)
    }
}

fn parse_request(body: &Value) -> Result<(UserProfile, ExistingPolicies), InvalidInputError> {
    let fields = body.as_object().ok_or(InvalidInputError::MissingProfile)?;
    let profile = fields
        .get("profile")
        .ok_or(InvalidInputError::MissingProfile)?;
    let profile = UserProfile::from_value(profile)?;
    let existing = ExistingPolicies::from_value(
        fields.get("existingPolicyTypes").unwrap_or(&Value::Null),
    )?;
    Ok((profile, existing))
}

/// Error raised by the coverage service.
#[derive(Debug, thiserror::Error)]
pub enum CoverageServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
