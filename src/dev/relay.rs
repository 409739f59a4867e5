//! Forward this crate's log lines to a local development endpoint.

use std::fmt::Write as _;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Lines buffered before new ones are dropped.
const RELAY_CAPACITY: usize = 256;

/// Hosts treated as a local development machine.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]", "0.0.0.0"];

/// Returns `true` when `host` names a local development machine.
pub fn is_local_host(host: &str) -> bool {
  let host = host.trim().to_ascii_lowercase();
  let host = match host.rsplit_once(':') {
    Some((name, port))
      if !name.is_empty()
        && !name.ends_with(':')
        && !port.is_empty()
        && port.chars().all(|c| c.is_ascii_digit()) =>
    {
      name.to_string()
    }
    _ => host,
  };
  LOCAL_HOSTS.contains(&host.as_str()) || host.ends_with(".localhost")
}

/// JSON body posted to the companion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
  /// Level name, e.g. `INFO`.
  pub level: String,
  /// Module path the event came from.
  pub target: String,
  /// Rendered message with any extra fields appended as `name=value`.
  pub message: String,
}

/// `tracing` layer handing events to a [`RelayWorker`] without blocking the caller.
#[derive(Debug, Clone)]
pub struct DevLogRelay {
  sender: mpsc::Sender<LogLine>,
}

/// Background half of the relay that performs the POSTs.
#[derive(Debug)]
pub struct RelayWorker {
  client: reqwest::Client,
  endpoint: String,
  receiver: mpsc::Receiver<LogLine>,
}

impl DevLogRelay {
  /// Create a relay layer and the worker that must be spawned on a Tokio runtime.
  pub fn new(endpoint: impl Into<String>) -> (Self, RelayWorker) {
    let (sender, receiver) = mpsc::channel(RELAY_CAPACITY);
    let worker = RelayWorker {
      client: reqwest::Client::new(),
      endpoint: endpoint.into(),
      receiver,
    };
    (Self { sender }, worker)
  }
}

impl RelayWorker {
  /// POST every queued line. Failures are ignored; the loop ends when the layer is dropped.
  pub async fn run(mut self) {
    while let Some(line) = self.receiver.recv().await {
      let _ = self.client.post(&self.endpoint).json(&line).send().await;
    }
  }
}

impl<S: Subscriber> Layer<S> for DevLogRelay {
  fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
    let metadata = event.metadata();
    // only our own lines; the HTTP stack's events would feed back into the relay
    if !metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
      return;
    }

    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    let _ = self.sender.try_send(LogLine {
      level: metadata.level().to_string(),
      target: metadata.target().to_string(),
      message: visitor.finish(),
    });
  }
}

#[derive(Default)]
struct MessageVisitor {
  message: String,
  fields: String,
}

impl MessageVisitor {
  fn finish(self) -> String {
    if self.fields.is_empty() {
      self.message
    } else if self.message.is_empty() {
      self.fields.trim_start().to_string()
    } else {
      format!("{}{}", self.message, self.fields)
    }
  }
}

impl Visit for MessageVisitor {
  fn record_str(&mut self, field: &Field, value: &str) {
    if field.name() == "message" {
      self.message.push_str(value);
    } else {
      let _ = write!(self.fields, " {}={}", field.name(), value);
    }
  }

  fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
    if field.name() == "message" {
      let _ = write!(self.message, "{value:?}");
    } else {
      let _ = write!(self.fields, " {}={:?}", field.name(), value);
    }
  }
}

/// Run `f` under a relay-backed subscriber and return the crate lines it emitted.
#[cfg(test)]
pub(crate) fn capture_crate_logs<F: FnOnce()>(f: F) -> Vec<LogLine> {
  use tracing_subscriber::layer::SubscriberExt;

  let (relay, mut worker) = DevLogRelay::new("http://127.0.0.1:9/log");
  tracing::subscriber::with_default(tracing_subscriber::registry().with(relay), f);

  let mut lines = Vec::new();
  while let Ok(line) = worker.receiver.try_recv() {
    lines.push(line);
  }
  lines
}
