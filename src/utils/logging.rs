// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

// HTML parsing and HTTP crates are chatty at debug level
const QUIET_DEPENDENCIES: &str =
    "html5ever=warn,selectors=warn,hyper=warn,hyper_util=warn,reqwest=warn";

/// Initializes the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` picks `debug` over `info`
/// for this crate, with dependency crates held at `warn`.
pub fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}", level, QUIET_DEPENDENCIES)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("Logging setup complete (level {}).", level);
}
