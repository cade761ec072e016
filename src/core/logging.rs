//! Logging initialization

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Initialize env_logger with the `info` default filter.
///
/// Override with the RUST_LOG environment variable.
///
/// # Example
/// ```no_run
/// bulbtree::core::logging::init();
/// log::info!("Building octree");
/// ```
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize env_logger with `default_filter` unless RUST_LOG is set.
///
/// Per-level build progress is logged at `debug`, so tools pass
/// `"bulbtree=debug"` for a verbose run.
pub fn init_with_filter(default_filter: &str) {
    let result = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter)
    )
    .format_timestamp_millis()
    .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
