//! Configuration describing where each media category is served from.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{LEGACY_CATEGORY, MediaKind};

/// File name searched for by [`MediaConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "media.config.json";

/// Category name paired with the base directory its assets are served from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryDir {
  /// Category name, e.g. `homepage-hero`.
  pub category: String,
  /// Base directory, e.g. `assets/images/homepage-hero/`.
  pub dir: String,
}

impl CategoryDir {
  fn new(category: &str, dir: &str) -> Self {
    Self {
      category: category.into(),
      dir: dir.into(),
    }
  }
}

/// Ordered category table. Iteration order is the matching precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CategoryTable(Vec<CategoryDir>);

impl CategoryTable {
  /// Build a table from `(category, dir)` pairs.
  pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
    Self(
      pairs
        .into_iter()
        .map(|(category, dir)| CategoryDir::new(category, dir))
        .collect(),
    )
  }

  /// Base directory configured for `category`.
  pub fn dir(&self, category: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|entry| entry.category == category)
      .map(|entry| entry.dir.as_str())
  }

  /// Entries in precedence order.
  pub fn iter(&self) -> impl Iterator<Item = &CategoryDir> {
    self.0.iter()
  }

  /// Directory of the `legacy` entry, if configured.
  pub fn legacy_dir(&self) -> Option<&str> {
    self.dir(LEGACY_CATEGORY)
  }
}

/// Settings only used while developing the site locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DevConfig {
  /// JSON resource of the form `{"lastUpdate": <epoch-millis>}`.
  pub timestamp_url: String,
  /// Seconds between timestamp polls.
  pub poll_interval_secs: u64,
  /// Companion endpoint accepting log lines as JSON.
  pub log_endpoint: String,
  /// Host the site is served from; the log relay only runs for local hosts.
  pub site_host: String,
}

impl Default for DevConfig {
  fn default() -> Self {
    Self {
      timestamp_url: "http://localhost:3000/last-update.json".into(),
      poll_interval_secs: 3,
      log_endpoint: "http://localhost:3000/log".into(),
      site_host: "localhost".into(),
    }
  }
}

/// Immutable configuration handed to [`crate::MediaPathResolver`] at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
  /// Category table for still images.
  pub images: CategoryTable,
  /// Category table for videos and preview attributes.
  pub videos: CategoryTable,
  /// Query parameter appended to every rewritten value.
  pub cache_marker: String,
  /// Attribute holding bare preview filenames.
  pub preview_attribute: String,
  /// Development-mode settings.
  pub dev: DevConfig,
}

impl Default for MediaConfig {
  fn default() -> Self {
    Self {
      images: CategoryTable::from_pairs([
        ("homepage-hero", "assets/images/homepage-hero/"),
        ("homepage-featured", "assets/images/homepage-featured/"),
        ("testimonials", "assets/images/testimonials/"),
        ("team", "assets/images/team/"),
        ("venues-intro", "assets/images/venues-intro/"),
        ("venues-regions", "assets/images/venues-regions/"),
        ("services", "assets/images/services/"),
        ("gallery", "assets/images/gallery/"),
        (LEGACY_CATEGORY, "assets/images/"),
      ]),
      videos: CategoryTable::from_pairs([
        ("homepage-hero", "assets/videos/homepage-hero/"),
        ("testimonials", "assets/videos/testimonials/"),
        ("venues-intro", "assets/videos/venues-intro/"),
        (LEGACY_CATEGORY, "assets/videos/"),
      ]),
      cache_marker: "dynamic=true".into(),
      preview_attribute: "data-preview".into(),
      dev: DevConfig::default(),
    }
  }
}

/// Errors that can occur while loading an explicit configuration file.
#[derive(Debug)]
pub enum ConfigError {
  /// Failed to read the configuration file.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the JSON configuration.
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

impl MediaConfig {
  /// Look for [`DEFAULT_CONFIG_FILE`] inside `dir`.
  ///
  /// A missing file yields the built-in tables. An unreadable or malformed file is returned
  /// as an error so the caller can report it before falling back to the defaults.
  pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match Self::load(&candidate) {
      Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
        Ok(Self::default())
      }
      result => result,
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
      path: path.to_path_buf(),
      source: err,
    })?;
    serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
      path: path.to_path_buf(),
      source: err,
    })
  }

  /// Category table for `kind`.
  pub fn table(&self, kind: MediaKind) -> &CategoryTable {
    match kind {
      MediaKind::Images => &self.images,
      MediaKind::Videos => &self.videos,
    }
  }

  /// Flat legacy roots of both tables.
  pub fn legacy_roots(&self) -> impl Iterator<Item = &str> {
    [self.images.legacy_dir(), self.videos.legacy_dir()]
      .into_iter()
      .flatten()
  }
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::Parse { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io { source, .. } => Some(source),
      Self::Parse { source, .. } => Some(source),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn default_tables_keep_declared_order() {
    let config = MediaConfig::default();
    let names: Vec<&str> = config
      .videos
      .iter()
      .map(|entry| entry.category.as_str())
      .collect();
    assert_eq!(names, vec![
      "homepage-hero",
      "testimonials",
      "venues-intro",
      "legacy"
    ]);
  }

  #[test]
  fn looks_up_directories_per_kind() {
    let config = MediaConfig::default();
    assert_eq!(
      config.table(MediaKind::Videos).dir("testimonials"),
      Some("assets/videos/testimonials/")
    );
    assert_eq!(config.table(MediaKind::Videos).dir("team"), None);
    let roots: Vec<&str> = config.legacy_roots().collect();
    assert_eq!(roots, vec!["assets/images/", "assets/videos/"]);
  }

  #[test]
  fn discover_falls_back_to_defaults_when_missing() {
    let temp = tempdir().expect("failed to create temp dir");
    let config = MediaConfig::discover(temp.path()).expect("missing file is not an error");
    assert_eq!(config, MediaConfig::default());
  }

  #[test]
  fn discover_reports_malformed_file() {
    let temp = tempdir().expect("failed to create temp dir");
    std::fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{not json")
      .expect("failed to write config");

    let err = MediaConfig::discover(temp.path()).expect_err("malformed file must be reported");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
  }

  #[test]
  fn load_reads_partial_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    std::fs::write(
      &path,
      r#"{
        "images": [{"category": "gallery", "dir": "media/gallery/"}],
        "dev": {"poll_interval_secs": 10}
      }"#,
    )
    .expect("failed to write config");

    let config = MediaConfig::load(&path).expect("configuration should load");
    assert_eq!(config.images.dir("gallery"), Some("media/gallery/"));
    assert_eq!(config.images.legacy_dir(), None);
    assert_eq!(config.videos, MediaConfig::default().videos);
    assert_eq!(config.dev.poll_interval_secs, 10);
    assert_eq!(config.dev.site_host, "localhost");
    assert_eq!(config.cache_marker, "dynamic=true");
  }

  #[test]
  fn load_reports_parse_errors_with_path() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("broken.json");
    std::fs::write(&path, "[]").expect("failed to write config");

    let err = MediaConfig::load(&path).expect_err("array is not a config object");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
  }
}
