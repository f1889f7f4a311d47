//! Diagnostic logging for the reporter itself (not build output).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `format_messages_native=debug`.
pub const LOG_ENV: &str = "FORMAT_MESSAGES_LOG";

/// Install a stderr subscriber. Safe to call more than once; later calls and
/// hosts that already installed a subscriber are left alone.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
