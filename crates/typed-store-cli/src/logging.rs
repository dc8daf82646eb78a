//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr.
///
/// - Respects `RUST_LOG` if set
/// - Otherwise `-v` selects debug and `-vv` trace; the default is warn
pub fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
