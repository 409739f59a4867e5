//! Development-only helpers: timestamp polling for reloads and the local log relay.

mod relay;
mod watcher;

pub use relay::{DevLogRelay, LogLine, RelayWorker, is_local_host};
#[cfg(test)]
pub(crate) use relay::capture_crate_logs;
pub use watcher::{ReloadWatcher, TimestampTracker, parse_timestamp};
