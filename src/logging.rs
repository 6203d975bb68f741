use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. An unparsable filter falls back to `warn`;
/// a second call is a no-op.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
