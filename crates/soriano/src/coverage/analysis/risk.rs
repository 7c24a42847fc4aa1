use serde::{Deserialize, Serialize};

use super::config::RiskThresholds;

/// Risk label shown next to the protection score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Bajo,
    Medio,
    Alto,
    Critico,
}

impl RiskLevel {
    pub fn from_score(score: u8, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.bajo() {
            RiskLevel::Bajo
        } else if score >= thresholds.medio() {
            RiskLevel::Medio
        } else if score >= thresholds.alto() {
            RiskLevel::Alto
        } else {
            RiskLevel::Critico
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Bajo => "BAJO",
            RiskLevel::Medio => "MEDIO",
            RiskLevel::Alto => "ALTO",
            RiskLevel::Critico => "CRITICO",
        }
    }
}
