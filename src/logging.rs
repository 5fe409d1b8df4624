use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// Reads the filter from `CREDITSHIFT_LOG` (same syntax as `RUST_LOG`),
/// defaulting to `info`. Calling it twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("CREDITSHIFT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
}
