use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// SMTP session chatter is only interesting when debugging mail delivery.
const QUIET_DIRECTIVES: &[&str] = &["lettre=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
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

/// Install the global fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn configured_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let mut directives = vec![log_level.trim().to_string()];
    directives.extend(
        QUIET_DIRECTIVES
            .iter()
            .filter(|directive| {
                let crate_name = directive.split('=').next().unwrap_or_default();
                !log_level.contains(crate_name)
            })
            .map(|directive| directive.to_string()),
    );
    let value = directives.join(",");

    EnvFilter::try_new(&value).map_err(|source| TelemetryError::EnvFilter {
        value: log_level.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_quiets_smtp_chatter() {
        let filter = configured_filter("debug").expect("valid filter");
        let rendered = filter.to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("lettre=warn"));
    }

    #[test]
    fn explicit_crate_directive_is_respected() {
        let filter = configured_filter("info,lettre=trace").expect("valid filter");
        let rendered = filter.to_string();
        assert!(rendered.contains("lettre=trace"));
        assert!(!rendered.contains("lettre=warn"));
    }

    #[test]
    fn invalid_level_reports_original_value() {
        match configured_filter("info,lettre=loudly") {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "info,lettre=loudly"),
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}
