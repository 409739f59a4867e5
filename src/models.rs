//! Data structures shared by the resolver, the page rewriter and the CLI.

use std::fmt;
use std::str::FromStr;

/// Reserved category name for the flat, uncategorised asset layout.
pub const LEGACY_CATEGORY: &str = "legacy";

/// Which category table a media reference is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
  /// Still images (`<img>`, `<source>` inside `<picture>`).
  Images,
  /// Video files (`<video>`, `<source>` inside `<video>`, preview attributes).
  Videos,
}

impl MediaKind {
  /// Lowercase name used in logs and on the command line.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Images => "images",
      Self::Videos => "videos",
    }
  }
}

impl fmt::Display for MediaKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MediaKind {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "images" | "image" => Ok(Self::Images),
      "videos" | "video" => Ok(Self::Videos),
      other => Err(format!("unknown media kind `{other}` (expected images or videos)")),
    }
  }
}

/// Named bucket controlling the canonical base directory of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
  /// Create a category from its configured name.
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  /// The reserved `legacy` category.
  pub fn legacy() -> Self {
    Self(LEGACY_CATEGORY.to_string())
  }

  /// Returns `true` for the reserved `legacy` category.
  pub fn is_legacy(&self) -> bool {
    self.0 == LEGACY_CATEGORY
  }

  /// Category name as configured.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Category {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

/// One enclosing element of a media reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestor {
  /// Lowercase tag name.
  pub tag: String,
  /// Class names in attribute order.
  pub classes: Vec<String>,
}

impl Ancestor {
  /// Build an ancestor from a tag name and a raw `class` attribute value.
  pub fn new(tag: &str, class_attr: &str) -> Self {
    Self {
      tag: tag.to_ascii_lowercase(),
      classes: class_attr.split_whitespace().map(str::to_string).collect(),
    }
  }

  /// Returns `true` when the element carries `class`.
  pub fn has_class(&self, class: &str) -> bool {
    self.classes.iter().any(|value| value == class)
  }
}

/// Read-only facts about where a media element sits.
///
/// `ancestors` is ordered nearest first. The page path is the URL path the element was
/// rendered for, e.g. `/venues/index.html`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementContext {
  /// URL path of the loaded page.
  pub page_path: String,
  /// Enclosing elements, nearest first.
  pub ancestors: Vec<Ancestor>,
}

impl ElementContext {
  /// Context for an element rendered on `page_path`.
  pub fn new(page_path: impl Into<String>) -> Self {
    Self {
      page_path: page_path.into(),
      ancestors: Vec::new(),
    }
  }

  /// Append an enclosing element further out than the ones already recorded.
  pub fn with_ancestor(mut self, tag: &str, class_attr: &str) -> Self {
    self.ancestors.push(Ancestor::new(tag, class_attr));
    self
  }

  /// Returns `true` when any enclosing element carries `class`.
  pub fn is_within(&self, class: &str) -> bool {
    self.ancestors.iter().any(|ancestor| ancestor.has_class(class))
  }

  /// Tag name of the direct parent, if any.
  pub fn parent_tag(&self) -> Option<&str> {
    self.ancestors.first().map(|ancestor| ancestor.tag.as_str())
  }
}

/// Why an element was left untouched without any attempt at classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// The attribute was empty.
  Empty,
  /// The value already carries the cache-busting marker.
  AlreadyResolved,
}

/// Outcome of resolving a single media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Nothing to do.
  Skipped(SkipReason),
  /// The reference was classified and a new value computed.
  Rewritten {
    /// Category the reference was classified into.
    category: Category,
    /// Value to write back onto the element.
    value: String,
  },
  /// The category had no directory for the requested kind; the reference stays as authored.
  Unresolved {
    /// Category the reference was classified into.
    category: Category,
  },
}

impl Resolution {
  /// New attribute value when the reference was rewritten.
  pub fn value(&self) -> Option<&str> {
    match self {
      Self::Rewritten { value, .. } => Some(value),
      _ => None,
    }
  }

  /// Category chosen during classification, if classification ran.
  pub fn category(&self) -> Option<&Category> {
    match self {
      Self::Rewritten { category, .. } | Self::Unresolved { category } => Some(category),
      Self::Skipped(_) => None,
    }
  }
}

/// Counters describing one rewrite batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
  /// Elements whose attribute value was replaced.
  pub updated: usize,
  /// Elements skipped because they were empty or already resolved.
  pub skipped: usize,
  /// Elements left as authored because their category had no directory.
  pub unresolved: usize,
}

impl RewriteReport {
  /// Record a single resolution outcome.
  pub fn record(&mut self, resolution: &Resolution) {
    match resolution {
      Resolution::Skipped(_) => self.skipped += 1,
      Resolution::Rewritten { .. } => self.updated += 1,
      Resolution::Unresolved { .. } => self.unresolved += 1,
    }
  }

  /// Fold another report into this one.
  pub fn merge(&mut self, other: RewriteReport) {
    self.updated += other.updated;
    self.skipped += other.skipped;
    self.unresolved += other.unresolved;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_media_kind_names() {
    assert_eq!("images".parse::<MediaKind>(), Ok(MediaKind::Images));
    assert_eq!(" Video ".parse::<MediaKind>(), Ok(MediaKind::Videos));
    assert!("audio".parse::<MediaKind>().is_err());
  }

  #[test]
  fn ancestor_splits_class_attribute() {
    let ancestor = Ancestor::new("DIV", "  venue-card   intro ");
    assert_eq!(ancestor.tag, "div");
    assert_eq!(ancestor.classes, vec!["venue-card".to_string(), "intro".to_string()]);
    assert!(ancestor.has_class("intro"));
    assert!(!ancestor.has_class("int"));
  }

  #[test]
  fn context_checks_every_ancestor() {
    let context = ElementContext::new("/venues")
      .with_ancestor("figure", "")
      .with_ancestor("div", "region-grid region");

    assert!(context.is_within("region"));
    assert!(!context.is_within("intro"));
    assert_eq!(context.parent_tag(), Some("figure"));
  }

  #[test]
  fn report_counts_outcomes() {
    let mut report = RewriteReport::default();
    report.record(&Resolution::Skipped(SkipReason::Empty));
    report.record(&Resolution::Rewritten {
      category: Category::legacy(),
      value: "a.jpg?dynamic=true".into(),
    });
    report.record(&Resolution::Unresolved {
      category: Category::new("team"),
    });

    let mut total = RewriteReport::default();
    total.merge(report);
    total.merge(report);
    assert_eq!(total, RewriteReport {
      updated: 2,
      skipped: 2,
      unresolved: 2,
    });
  }
}
