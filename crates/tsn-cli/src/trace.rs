//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Filtering comes from `TSN_LOG`
/// (e.g. `TSN_LOG=tsn_specializer=trace`); default is warnings only.
pub fn init() {
    let filter = EnvFilter::try_from_env("TSN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
