//! Subscriber installation. Filter directives come from `LORE_LOG`, falling
//! back to the configured filter (default `lore=info`).

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "LORE_LOG";

static INIT: Once = Once::new();

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a human-readable subscriber with the default filter. Safe to call
/// more than once; only the first call (or an already-installed global
/// subscriber) wins.
pub fn init_tracing() {
    init_from_config(&ObservabilityConfig::default());
}

/// Install a JSON subscriber for structured log shipping.
pub fn init_tracing_json() {
    init_from_config(&ObservabilityConfig {
        json: true,
        ..ObservabilityConfig::default()
    });
}

pub fn init_from_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = env_filter(&config.log_filter);
        let installed = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_current_span(true))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .try_init()
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}
