//! Logging init: human-readable lines on stderr, optionally relayed to a local endpoint.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::dev::DevLogRelay;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,media_paths=debug";

/// Install the global subscriber.
///
/// `relay` is added as an extra layer when present; it only sees events that pass the
/// `RUST_LOG` filter.
pub fn init(relay: Option<DevLogRelay>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(relay)
        .try_init()?;

    Ok(())
}
