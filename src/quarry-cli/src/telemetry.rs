//! Logging setup for the command-line tool
//!
//! Logs go to stderr so stdout stays clean for results:
//! - human-readable lines by default
//! - JSON lines with `--log-json`
//!
//! `RUST_LOG` takes precedence over `--debug`.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEBUG_FILTER: &str = "quarry=debug,quarry_cli=debug,quarry_rs=debug,quarry_core=debug";
const DEFAULT_FILTER: &str = "warn";

pub fn default_filter(debug_enabled: bool) -> &'static str {
    if debug_enabled {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the global subscriber
pub fn init_telemetry(debug_enabled: bool, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug_enabled)));

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_target(true)
    });

    let console_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(console_layer)
        .try_init()?;

    tracing::debug!(debug_enabled, json, "Telemetry initialized");
    Ok(())
}
