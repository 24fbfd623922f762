use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingSettings;

/// Build the filter: `RUST_LOG` when set, else the configured level.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_directive()))
}

/// Install a stderr fmt subscriber. Stdout stays free for responses.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init(settings: &LoggingSettings) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(fmt_layer)
        .try_init();
}
