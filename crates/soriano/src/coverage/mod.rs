//! Coverage gap analysis: catalog, scoring rules, persistence seam and HTTP routes.

pub mod analysis;
pub mod catalog;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analysis::{
    AnalyzerConfig, CoverageAnalysis, CoverageAnalyzer, CoverageGap, GapSeverity,
    PolicyRecommendation, RiskLevel, RiskThresholds, ScoreComponent,
};
pub use catalog::{MonthlyCostRange, PolicyPriority};
pub use domain::{
    EmploymentStatus, ExistingPolicies, HousingStatus, IncomeBracket, InvalidInputError,
    MaritalStatus, PolicyType, TravelFrequency, UserId, UserProfile,
};
pub use repository::{ProfileRecord, ProfileRepository, ProfileView, RepositoryError};
pub use router::coverage_router;
pub use service::{CoverageService, CoverageServiceError};
