//! Logging initialization.
//!
//! Embedders call [`init`] once at startup; tests and library consumers that
//! bring their own subscriber simply don't.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber per `config`.
///
/// The filter comes from the config when set, otherwise `RUST_LOG`, otherwise
/// `info`. Re-initialization (e.g. from tests) is ignored.
pub fn init(config: &LoggingConfig) {
    if !config.stdout {
        return;
    }

    let filter = config
        .filter
        .clone()
        .map(EnvFilter::new)
        .unwrap_or_else(|| {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        });

    // try_init: a subscriber may already be installed; leave it alone.
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match config.stdout_format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
