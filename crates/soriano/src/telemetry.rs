use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Transport crates stay at `warn` unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "tower=warn", "axum::rejection=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid APP_LOG_LEVEL '{value}' for the portal subscriber")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Builds the filter used when `RUST_LOG` is absent: the configured level for
/// the portal crates, quieter transport logs.
pub fn portal_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let level = log_level.trim();
    let invalid = |source| TelemetryError::EnvFilter {
        value: log_level.to_string(),
        source,
    };

    let mut filter = EnvFilter::try_new(level).map_err(invalid)?;
    for directive in QUIET_DEPENDENCIES {
        filter = filter.add_directive(directive.parse().map_err(invalid)?);
    }
    Ok(filter)
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
/// Targets are kept so coverage, club and session events stay attributable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => portal_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_filter_quiets_transport_crates() {
        let rendered = portal_filter("debug").expect("valid level").to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("hyper=warn"));
        assert!(rendered.contains("tower=warn"));
    }

    #[test]
    fn portal_filter_rejects_malformed_levels() {
        let err = portal_filter("soriano=verbose").expect_err("unknown level");
        assert!(err.to_string().contains("soriano=verbose"));
    }
}
