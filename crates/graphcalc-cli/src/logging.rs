//! Log subscriber setup

use crate::config::Verbosity;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins over the verbosity flags. Calling this twice is harmless.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
