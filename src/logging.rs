//! # Structured Logging Module
//!
//! Environment-aware `tracing` setup plus helpers that emit one structured event per
//! search operation.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber once. Later calls are no-ops.
///
/// `RUST_LOG` takes precedence over the environment-derived level. Set
/// `MEMBER_SEARCH_LOG_FORMAT=json` for JSON lines instead of human-readable output.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let layer = if use_json_format() {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .boxed()
        };

        // a host application may already own the global subscriber
        if tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::info!(
            environment = %environment,
            pid = std::process::id(),
            "Structured logging initialized"
        );
    });
}

fn get_environment() -> String {
    std::env::var("MEMBER_SEARCH_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        "test" => "warn".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("MEMBER_SEARCH_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Summarise one search call
pub fn log_query_operation(
    operation: &str,
    strategy: Option<&str>,
    status: &str,
    rows: usize,
    total: Option<u64>,
    duration_ms: u64,
) {
    tracing::info!(
        operation = %operation,
        strategy = strategy,
        status = %status,
        rows = rows,
        total = total,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "QUERY_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_detection() {
        std::env::set_var("MEMBER_SEARCH_ENV", "staging");
        assert_eq!(get_environment(), "staging");
        std::env::remove_var("MEMBER_SEARCH_ENV");
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("test"), "warn");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        log_query_operation("search_page", Some("coupled"), "ok", 2, Some(4), 1);
        log_error("search", "search_page", "boom", None);
    }
}
