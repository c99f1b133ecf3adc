//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

use crate::error::ProbeError;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "APIPROBE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global fmt subscriber. Diagnostics go to stderr so the
/// report on stdout stays clean for piping.
pub fn init() -> Result<(), ProbeError> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ProbeError::Logging(e.to_string()))
}
