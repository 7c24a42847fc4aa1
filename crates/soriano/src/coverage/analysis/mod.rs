mod config;
mod gaps;
mod risk;
mod rules;

pub use config::{AnalyzerConfig, RiskThresholds};
pub use gaps::{CoverageGap, GapSeverity};
pub use risk::RiskLevel;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::catalog::{CatalogEntry, MonthlyCostRange, PolicyPriority};
use super::domain::{ExistingPolicies, InvalidInputError, PolicyType, UserProfile};

/// Stateless analyzer applying the catalog and gap rules to a profile.
#[derive(Debug, Clone, Default)]
pub struct CoverageAnalyzer {
    config: AnalyzerConfig,
}

impl CoverageAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Pure and deterministic: the same inputs always produce the same analysis.
    pub fn analyze(&self, profile: &UserProfile, existing: &ExistingPolicies) -> CoverageAnalysis {
        let evaluation = rules::evaluate_catalog(profile, existing, &self.config);
        let gaps = gaps::detect_gaps(profile, existing);
        let potential_savings = rules::bundle_savings(&evaluation.missing, &self.config);
        let estimated_risk = rules::estimated_risk(&evaluation.missing);
        let recommendations =
            rules::recommendation_lines(&evaluation.missing, potential_savings, &self.config);

        CoverageAnalysis {
            overall_score: evaluation.score,
            risk_level: RiskLevel::from_score(evaluation.score, &self.config.thresholds),
            existing_policies: existing.iter().collect(),
            missing_policies: evaluation
                .missing
                .iter()
                .map(|entry| PolicyRecommendation::from_entry(entry))
                .collect(),
            gaps,
            estimated_risk,
            potential_savings,
            recommendations,
            score_breakdown: evaluation.components,
        }
    }

    /// Entry point for loosely-typed payloads coming from forms or the API.
    pub fn analyze_json(
        &self,
        profile: &Value,
        existing_policy_types: &Value,
    ) -> Result<CoverageAnalysis, InvalidInputError> {
        let profile = UserProfile::from_value(profile)?;
        let existing = ExistingPolicies::from_value(existing_policy_types)?;
        Ok(self.analyze(&profile, &existing))
    }
}

/// One missing but applicable policy line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecommendation {
    pub policy_type: PolicyType,
    pub name: String,
    pub priority: PolicyPriority,
    pub urgency: u8,
    pub monthly_cost: MonthlyCostRange,
    pub potential_loss: u64,
    pub reason: String,
    pub coverages: Vec<String>,
}

impl PolicyRecommendation {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            policy_type: entry.policy_type,
            name: entry.name.to_string(),
            priority: entry.priority,
            urgency: entry.urgency,
            monthly_cost: entry.monthly_cost,
            potential_loss: entry.potential_loss,
            reason: entry.reason.to_string(),
            coverages: entry.coverages.iter().map(|item| item.to_string()).collect(),
        }
    }
}

/// Per-line audit trail of how the score was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub policy_type: PolicyType,
    pub covered: bool,
    pub deduction: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageAnalysis {
    pub overall_score: u8,
    pub risk_level: RiskLevel,
    pub existing_policies: Vec<PolicyType>,
    pub missing_policies: Vec<PolicyRecommendation>,
    pub gaps: Vec<CoverageGap>,
    pub estimated_risk: u64,
    pub potential_savings: f64,
    pub recommendations: Vec<String>,
    pub score_breakdown: Vec<ScoreComponent>,
}

impl CoverageAnalysis {
    pub fn is_missing(&self, policy_type: PolicyType) -> bool {
        self.missing_policies
            .iter()
            .any(|recommendation| recommendation.policy_type == policy_type)
    }

    pub fn summary(&self) -> String {
        format!(
            "protection score {} ({}), {} missing polic{}, {} gap(s)",
            self.overall_score,
            self.risk_level.label(),
            self.missing_policies.len(),
            if self.missing_policies.len() == 1 {
                "y"
            } else {
                "ies"
            },
            self.gaps.len()
        )
    }
}
