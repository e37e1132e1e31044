//! Structured logging configuration.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::TelemetryConfig;

/// Builds the level filter: `RUST_LOG` first, then the configured level.
#[must_use]
pub fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(config))
}

/// Builds the filter from the configured level alone.
///
/// An unparsable level falls back to `info`.
#[must_use]
pub fn configured_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging based on configuration.
///
/// Must be called at most once per process.
pub fn init_logging(config: &TelemetryConfig) {
    let filter = build_filter(config);

    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_configured_directive() {
        let config = TelemetryConfig::new("test").with_log_level("schedule_server=debug");
        assert_eq!(configured_filter(&config).to_string(), "schedule_server=debug");
    }

    #[test]
    fn test_filter_falls_back_on_garbage() {
        let config = TelemetryConfig::new("test").with_log_level("schedule_server=loud");
        assert_eq!(configured_filter(&config).to_string(), "info");
    }
}
