//! Tracing initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber: env-filtered fmt output,
/// defaulting to info for this workspace and warn elsewhere.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,prenoto_api=info,prenoto_db=info,prenoto_core=info,tower_http=info")
    });

    // Ignore the error if a subscriber is already set (tests initialize
    // their own).
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
