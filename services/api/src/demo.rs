use crate::infra::{
    parse_policy_list, InMemoryMissionFacts, InMemoryProfileRepository, MemberActivity,
};
use chrono::{Duration, Utc};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use soriano::club::{ClubActivity, Mission, MissionGenerator, PrizeWheel, ProfileCompleteness};
use soriano::config::AppConfig;
use soriano::coverage::{
    CoverageAnalysis, CoverageAnalyzer, CoverageService, ExistingPolicies, UserId, UserProfile,
};
use soriano::error::AppError;
use soriano::session::{PortalRole, SessionIdentity, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to a JSON file holding the profile object
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Comma-separated policy types already held (e.g. VIDA,HOGAR)
    #[arg(long, value_parser = crate::infra::parse_policy_list)]
    pub(crate) existing: Option<ExistingPolicies>,
}

#[derive(Args, Debug)]
pub(crate) struct WheelArgs {
    /// Number of spins to simulate
    #[arg(long, default_value_t = 1000)]
    pub(crate) spins: u32,
    /// Seed for a reproducible run (defaults to OS entropy)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs { profile, existing } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&profile)?;
    let value: Value = serde_json::from_str(&raw)?;
    let profile = UserProfile::from_value(&value)?;
    let existing = existing.unwrap_or_default();

    let analysis = CoverageAnalyzer::new(config.analysis).analyze(&profile, &existing);
    render_analysis(&analysis);
    Ok(())
}

pub(crate) fn run_wheel(args: WheelArgs) -> Result<(), AppError> {
    let WheelArgs { spins, seed } = args;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let wheel = PrizeWheel::standard();
    let mut counts = vec![0u32; wheel.prizes().len()];

    for _ in 0..spins {
        let prize = wheel.spin(&mut rng)?;
        if let Some(index) = wheel.prizes().iter().position(|entry| entry.id == prize.id) {
            counts[index] += 1;
        }
    }

    println!("Prize wheel simulation ({spins} spins)");
    for (prize, count) in wheel.prizes().iter().zip(&counts) {
        let observed = if spins == 0 {
            0.0
        } else {
            f64::from(*count) / f64::from(spins)
        };
        println!(
            "- {:<40} expected {:>5.1}% | observed {:>5.1}% ({count})",
            prize.label,
            prize.probability * 100.0,
            observed * 100.0
        );
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let user = UserId("cliente-demo".to_string());

    println!("Soriano Club demo");

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let coverage = CoverageService::new(profiles.clone(), config.analysis.clone());
    coverage.store_profile(user.clone(), &sample_request())?;
    let analysis = coverage.analyze_stored(&user)?;
    render_analysis(&analysis);

    let facts = InMemoryMissionFacts::new(profiles);
    facts.record_activity(
        user.clone(),
        MemberActivity {
            completeness: ProfileCompleteness {
                personal_data: true,
                phone_verified: true,
                ..ProfileCompleteness::default()
            },
            pending_renewals: 1,
            open_claims: 0,
            activity: ClubActivity::default(),
        },
    );
    let missions = MissionGenerator::new(Arc::new(facts)).generate(&user)?;
    render_missions(&missions);

    let wheel = PrizeWheel::standard();
    let mut rng = StdRng::seed_from_u64(2024);
    println!("\nDaily wheel");
    for _ in 0..3 {
        let prize = wheel.spin(&mut rng)?;
        println!("- {}", prize.label);
    }

    let mut session = SessionStore::default();
    let now = Utc::now();
    session.sign_in(
        SessionIdentity {
            user_id: user,
            display_name: "Cliente Demo".to_string(),
            email: "demo@sorianomediadores.es".to_string(),
            role: PortalRole::Customer,
        },
        "demo-token",
        now + Duration::hours(8),
    );
    session.cache_analysis(analysis);
    session.cache_missions(missions);
    let snapshot = session.persist()?;
    let restored = SessionStore::initialize(Some(&snapshot), now);
    println!("\nSession");
    println!("- persisted snapshot: {} bytes", snapshot.len());
    println!(
        "- restored {} authenticated: {} | cached analysis kept: {}",
        restored
            .identity()
            .map(|identity| identity.display_name.as_str())
            .unwrap_or("anonymous"),
        restored.is_authenticated(now),
        restored.analysis().is_some()
    );

    Ok(())
}

fn sample_request() -> Value {
    json!({
        "profile": {
            "age": 38,
            "maritalStatus": "casado",
            "dependents": 2,
            "employmentStatus": "autonomo",
            "housingStatus": "hipoteca",
            "mortgageAmount": 165000,
            "vehicleValue": 18000,
            "pets": 1,
        },
        "existingPolicyTypes": ["HOGAR", "AUTO"],
    })
}

fn render_analysis(analysis: &CoverageAnalysis) {
    println!("\nCoverage analysis: {}", analysis.summary());
    println!(
        "- estimated uncovered risk {} € | potential bundle savings {:.2} €/month",
        analysis.estimated_risk, analysis.potential_savings
    );

    if !analysis.missing_policies.is_empty() {
        println!("Missing policies:");
        for missing in &analysis.missing_policies {
            println!(
                "  - {} [{}] urgency {} | {}-{} €/month",
                missing.name,
                missing.priority.label(),
                missing.urgency,
                missing.monthly_cost.min,
                missing.monthly_cost.max
            );
        }
    }

    if !analysis.gaps.is_empty() {
        println!("Gaps:");
        for gap in &analysis.gaps {
            println!("  - {} ({:?}): {}", gap.area, gap.severity, gap.impact);
        }
    }

    println!("Recommendations:");
    for line in &analysis.recommendations {
        println!("  - {line}");
    }
}

fn render_missions(missions: &[Mission]) {
    println!("\nMissions ({})", missions.len());
    for mission in missions {
        println!(
            "- [{:?}] {} (+{} pts, +{} XP)",
            mission.priority, mission.title, mission.points, mission.xp
        );
    }
}
