use tracing_subscriber::EnvFilter;

use crate::types::LogLevel;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `--log-level`; the level applies to the
/// toaster crates only, dependencies stay at `warn`.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,toaster={level},toaster_index={level},toaster_tables={level},tower_http={level}",
            level = level
        ))
    });

    // A second init (tests calling `run` repeatedly) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
