//! Tracing initialisation for binaries and test harnesses.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG` for fine-grained filtering, falling back to `level`
/// when unset. Setting `WARDEN_LOG_FORMAT=json` switches to
/// newline-delimited JSON lines for log aggregation pipelines.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let json = std::env::var("WARDEN_LOG_FORMAT")
        .map(|format| format == "json")
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}
