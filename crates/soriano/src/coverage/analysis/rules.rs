use super::super::catalog::{standard_catalog, CatalogEntry};
use super::super::domain::{ExistingPolicies, UserProfile};
use super::config::AnalyzerConfig;
use super::ScoreComponent;

pub(crate) struct CatalogEvaluation {
    pub components: Vec<ScoreComponent>,
    /// Ranked by urgency, catalog order on ties.
    pub missing: Vec<&'static CatalogEntry>,
    pub score: u8,
}

pub(crate) fn evaluate_catalog(
    profile: &UserProfile,
    existing: &ExistingPolicies,
    config: &AnalyzerConfig,
) -> CatalogEvaluation {
    let mut components = Vec::new();
    let mut missing = Vec::new();
    let mut total_deduction: u32 = 0;

    for entry in standard_catalog() {
        if !entry.is_relevant(profile) {
            continue;
        }

        if existing.contains(entry.policy_type) {
            components.push(ScoreComponent {
                policy_type: entry.policy_type,
                covered: true,
                deduction: 0,
            });
            continue;
        }

        let deduction = u32::from(entry.urgency) * u32::from(config.penalty_per_urgency);
        total_deduction += deduction;
        components.push(ScoreComponent {
            policy_type: entry.policy_type,
            covered: false,
            deduction,
        });
        missing.push(entry);
    }

    // stable: equal urgency keeps catalog order
    missing.sort_by(|left, right| right.urgency.cmp(&left.urgency));

    let score = 100u32.saturating_sub(total_deduction) as u8;

    CatalogEvaluation {
        components,
        missing,
        score,
    }
}

pub(crate) fn bundle_savings(missing: &[&CatalogEntry], config: &AnalyzerConfig) -> f64 {
    if missing.len() < config.bundle_min_policies {
        return 0.0;
    }

    let monthly_total: f64 = missing.iter().map(|entry| entry.monthly_cost.midpoint()).sum();
    round_cents(monthly_total * config.bundle_discount_rate)
}

pub(crate) fn estimated_risk(missing: &[&CatalogEntry]) -> u64 {
    missing.iter().map(|entry| entry.potential_loss).sum()
}

pub(crate) fn recommendation_lines(
    missing: &[&CatalogEntry],
    savings: f64,
    config: &AnalyzerConfig,
) -> Vec<String> {
    if missing.is_empty() {
        return vec![
            "Tu protección está al día; revisa tus pólizas en cada renovación".to_string(),
        ];
    }

    let mut lines: Vec<String> = missing
        .iter()
        .take(config.max_recommendations)
        .map(|entry| {
            format!(
                "Contrata un {} (desde {} €/mes): {}",
                entry.name, entry.monthly_cost.min, entry.reason
            )
        })
        .collect();

    if savings > 0.0 {
        lines.push(format!(
            "Agrupa {} pólizas con Soriano y ahorra unos {:.2} € al mes",
            missing.len(),
            savings
        ));
    }

    lines
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
