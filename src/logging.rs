//! Ambient diagnostics. The operator-visible log panel is a separate
//! concern (see [`crate::log`]); this wires `tracing` for everything else.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with environment filter support.
/// Diagnostics go to stderr so they interleave cleanly with the console's
/// stdout panel.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
