use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `NESTEGG_LOG=debug`.
pub const LOG_ENV: &str = "NESTEGG_LOG";

/// Installs the global fmt subscriber. Defaults to `info` when the filter
/// variable is unset or unparsable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
