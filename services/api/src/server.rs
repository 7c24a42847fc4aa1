use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMissionFacts, InMemoryProfileRepository};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use soriano::club::{ClubState, MissionGenerator, PrizeWheel};
use soriano::config::AppConfig;
use soriano::coverage::CoverageService;
use soriano::error::AppError;
use soriano::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let coverage_service = Arc::new(CoverageService::new(
        profiles.clone(),
        config.analysis.clone(),
    ));
    let club_state = ClubState {
        wheel: Arc::new(PrizeWheel::standard()),
        missions: Arc::new(MissionGenerator::new(Arc::new(InMemoryMissionFacts::new(
            profiles,
        )))),
    };

    let app = with_portal_routes(coverage_service, club_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        penalty = config.analysis.penalty_per_urgency,
        "soriano portal services ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
