//! Poll a timestamp resource and trigger a reload when it advances.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::time::{self, MissedTickBehavior};

use crate::config::DevConfig;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimestampDocument {
    last_update: u64,
}

/// Extract `lastUpdate` from a `{"lastUpdate": <epoch-millis>}` body.
///
/// Malformed bodies yield `None`, which callers treat as "no update".
pub fn parse_timestamp(body: &[u8]) -> Option<u64> {
    serde_json::from_slice::<TimestampDocument>(body)
        .ok()
        .map(|document| document.last_update)
}

/// Remembers the last timestamp seen and reports when it moves forward.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampTracker {
    last_seen: Option<u64>,
}

impl TimestampTracker {
    /// Record an observation. Returns `true` when a reload is due.
    ///
    /// The first observation only sets the baseline; missing observations are ignored.
    pub fn observe(&mut self, timestamp: Option<u64>) -> bool {
        let Some(timestamp) = timestamp else {
            return false;
        };

        match self.last_seen {
            Some(previous) if timestamp > previous => {
                self.last_seen = Some(timestamp);
                true
            }
            Some(_) => false,
            None => {
                self.last_seen = Some(timestamp);
                false
            }
        }
    }

    /// Most recent timestamp observed.
    pub fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }
}

/// Polls [`DevConfig::timestamp_url`] on a fixed interval.
#[derive(Debug)]
pub struct ReloadWatcher {
    client: reqwest::Client,
    url: String,
    interval: Duration,
    tracker: TimestampTracker,
}

impl ReloadWatcher {
    /// Watcher for the configured timestamp resource.
    pub fn new(config: &DevConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("media-paths/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.poll_interval_secs.max(1)))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.timestamp_url.clone(),
            interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            tracker: TimestampTracker::default(),
        })
    }

    /// Override the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fetch the timestamp once. Returns `true` when it advanced past the last observation.
    pub async fn poll_once(&mut self) -> bool {
        let timestamp = self.fetch().await;
        self.tracker.observe(timestamp)
    }

    /// Poll forever, calling `on_reload` each time the timestamp advances.
    ///
    /// Network failures are swallowed; the loop ends only with the process.
    pub async fn run<F>(mut self, mut on_reload: F)
    where
        F: FnMut(),
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(url = %self.url, interval = ?self.interval, "watching for site updates");

        loop {
            ticker.tick().await;
            if self.poll_once().await {
                tracing::info!(
                    last_update = ?self.tracker.last_seen(),
                    "site updated, reloading"
                );
                on_reload();
            }
        }
    }

    async fn fetch(&self) -> Option<u64> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = response.bytes().await.ok()?;
        parse_timestamp(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_last_update_field() {
        assert_eq!(parse_timestamp(br#"{"lastUpdate": 1718000000000}"#), Some(1_718_000_000_000));
        assert_eq!(parse_timestamp(br#"{"lastUpdate": "soon"}"#), None);
        assert_eq!(parse_timestamp(b"<html>404</html>"), None);
        assert_eq!(parse_timestamp(b""), None);
    }

    #[test]
    fn first_observation_sets_baseline() {
        let mut tracker = TimestampTracker::default();
        assert!(!tracker.observe(Some(10)));
        assert_eq!(tracker.last_seen(), Some(10));
    }

    #[test]
    fn reloads_only_when_timestamp_advances() {
        let mut tracker = TimestampTracker::default();
        tracker.observe(Some(10));

        assert!(!tracker.observe(Some(10)));
        assert!(!tracker.observe(None));
        assert!(!tracker.observe(Some(5)));
        assert!(tracker.observe(Some(11)));
        assert!(!tracker.observe(Some(11)));
        assert_eq!(tracker.last_seen(), Some(11));
    }

    #[test]
    fn missing_observations_do_not_set_baseline() {
        let mut tracker = TimestampTracker::default();
        assert!(!tracker.observe(None));
        assert_eq!(tracker.last_seen(), None);
    }

    #[tokio::test]
    async fn unreachable_resource_is_not_an_update() {
        let config = DevConfig {
            timestamp_url: "http://127.0.0.1:9/last-update.json".into(),
            poll_interval_secs: 1,
            ..DevConfig::default()
        };
        let mut watcher = ReloadWatcher::new(&config).unwrap();
        assert!(!watcher.poll_once().await);
        assert!(!watcher.poll_once().await);
    }
}
