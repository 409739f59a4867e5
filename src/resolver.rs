//! Compute canonical served paths for media references.

use crate::asset_paths::{append_marker, extract_filename, has_marker, join_base};
use crate::classify::{Classifier, RuleInput};
use crate::config::MediaConfig;
use crate::models::{Category, ElementContext, MediaKind, Resolution, SkipReason};

/// Category used for preview attributes inside testimonial containers.
const PREVIEW_TESTIMONIAL_CATEGORY: &str = "testimonials";
/// Category used for every other preview attribute.
const PREVIEW_DEFAULT_CATEGORY: &str = "homepage-hero";

/// A category had no directory in the table for the requested kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
  /// Table that was consulted.
  pub kind: MediaKind,
  /// Category that was missing.
  pub category: String,
}

impl std::fmt::Display for LookupError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "no {} directory configured for category `{}`",
      self.kind, self.category
    )
  }
}

impl std::error::Error for LookupError {}

/// Stateless classify-then-build resolver over an injected [`MediaConfig`].
#[derive(Debug)]
pub struct MediaPathResolver {
  config: MediaConfig,
  classifier: Classifier,
}

impl MediaPathResolver {
  /// Resolver using the standard classification chain.
  pub fn new(config: MediaConfig) -> Self {
    Self::with_classifier(config, Classifier::standard())
  }

  /// Resolver using a custom classification chain.
  pub fn with_classifier(config: MediaConfig, classifier: Classifier) -> Self {
    Self { config, classifier }
  }

  /// Configuration the resolver was built with.
  pub fn config(&self) -> &MediaConfig {
    &self.config
  }

  /// Resolve the media reference `current_path` found on an element.
  ///
  /// Empty references and references already carrying the cache-busting marker are skipped.
  /// A category without a directory for `kind` is logged and the reference is left as
  /// authored.
  pub fn resolve(
    &self,
    current_path: &str,
    kind: MediaKind,
    context: &ElementContext,
  ) -> Resolution {
    if let Some(reason) = self.skip_reason(current_path) {
      return Resolution::Skipped(reason);
    }

    let category = self.classifier.classify(&RuleInput {
      path: current_path,
      kind,
      context,
      config: &self.config,
    });
    self.build(current_path, kind, category)
  }

  /// Resolve a bare preview filename, which always targets the videos table.
  pub fn resolve_preview(&self, filename: &str, in_testimonial: bool) -> Resolution {
    if let Some(reason) = self.skip_reason(filename) {
      return Resolution::Skipped(reason);
    }

    let category = if filename.contains('/') {
      Category::legacy()
    } else if in_testimonial {
      Category::new(PREVIEW_TESTIMONIAL_CATEGORY)
    } else {
      Category::new(PREVIEW_DEFAULT_CATEGORY)
    };
    self.build(filename, MediaKind::Videos, category)
  }

  /// Served path of `filename` within `category`, without the cache-busting marker.
  ///
  /// Unknown categories are logged and `filename` is returned unchanged.
  pub fn path_for(&self, kind: MediaKind, category: &str, filename: &str) -> String {
    match self.lookup_dir(kind, category) {
      Ok(dir) => join_base(dir, filename),
      Err(err) => {
        tracing::error!("{err}; leaving `{filename}` unchanged");
        filename.to_string()
      }
    }
  }

  /// Base directory of `category` in the `kind` table.
  pub fn lookup_dir(&self, kind: MediaKind, category: &str) -> Result<&str, LookupError> {
    self
      .config
      .table(kind)
      .dir(category)
      .ok_or_else(|| LookupError {
        kind,
        category: category.to_string(),
      })
  }

  fn skip_reason(&self, value: &str) -> Option<SkipReason> {
    if value.trim().is_empty() {
      Some(SkipReason::Empty)
    } else if has_marker(value, &self.config.cache_marker) {
      Some(SkipReason::AlreadyResolved)
    } else {
      None
    }
  }

  fn build(&self, current_path: &str, kind: MediaKind, category: Category) -> Resolution {
    let marker = &self.config.cache_marker;
    if category.is_legacy() {
      return Resolution::Rewritten {
        value: append_marker(current_path, marker),
        category,
      };
    }

    match self.lookup_dir(kind, category.as_str()) {
      Ok(dir) => {
        let path = join_base(dir, extract_filename(current_path));
        Resolution::Rewritten {
          value: append_marker(&path, marker),
          category,
        }
      }
      Err(err) => {
        tracing::error!("{err}; leaving `{current_path}` as authored");
        Resolution::Unresolved { category }
      }
    }
  }
}

impl Default for MediaPathResolver {
  fn default() -> Self {
    Self::new(MediaConfig::default())
  }
}
