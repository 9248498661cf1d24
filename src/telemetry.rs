use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

use crate::config::LendingConfig;

/// Install the global tracing subscriber
///
/// Returns an error instead of panicking when a subscriber is already set,
/// so embedding applications and tests may call it more than once.
pub fn init_tracing(config: &LendingConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
