use serde::Serialize;

/// Score cut points for the risk label. `bajo > medio > alto` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskThresholds {
    bajo: u8,
    medio: u8,
    alto: u8,
}

impl RiskThresholds {
    /// Returns `None` unless the cut points are strictly decreasing and within 0..=100.
    pub fn new(bajo: u8, medio: u8, alto: u8) -> Option<Self> {
        (bajo <= 100 && bajo > medio && medio > alto).then_some(Self { bajo, medio, alto })
    }

    pub const fn bajo(&self) -> u8 {
        self.bajo
    }

    pub const fn medio(&self) -> u8 {
        self.medio
    }

    pub const fn alto(&self) -> u8 {
        self.alto
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            bajo: 80,
            medio: 50,
            alto: 25,
        }
    }
}

/// Tunable weights for the coverage analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerConfig {
    /// Score points deducted per urgency point of each missing policy.
    pub penalty_per_urgency: u8,
    pub bundle_discount_rate: f64,
    pub bundle_min_policies: usize,
    pub max_recommendations: usize,
    pub thresholds: RiskThresholds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            penalty_per_urgency: 2,
            bundle_discount_rate: 0.15,
            bundle_min_policies: 3,
            max_recommendations: 3,
            thresholds: RiskThresholds::default(),
        }
    }
}
