//! Individual classification rules, evaluated in order by [`super::Classifier`].

use crate::asset_paths::{category_segments, is_flat_under};
use crate::config::MediaConfig;
use crate::models::{Category, ElementContext, LEGACY_CATEGORY, MediaKind};

use super::tables::{CONTAINER_CATEGORIES, PAGE_RULES, nearest_container};

/// Everything a rule may look at when classifying one media reference.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
  /// Attribute value as authored.
  pub path: &'a str,
  /// Table the reference resolves against.
  pub kind: MediaKind,
  /// Position of the element in the page.
  pub context: &'a ElementContext,
  /// Configured category tables.
  pub config: &'a MediaConfig,
}

/// A single `(predicate, category)` step of the classification chain.
pub trait ClassificationRule: Send + Sync {
  /// Short name used in trace output.
  fn name(&self) -> &'static str;

  /// Category for `input`, or `None` to defer to the next rule.
  fn classify(&self, input: &RuleInput<'_>) -> Option<Category>;
}

/// Paths directly under a flat legacy root stay where they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyRootRule;

impl ClassificationRule for LegacyRootRule {
  fn name(&self) -> &'static str {
    "legacy-root"
  }

  fn classify(&self, input: &RuleInput<'_>) -> Option<Category> {
    input
      .config
      .legacy_roots()
      .any(|root| is_flat_under(input.path, root))
      .then(Category::legacy)
  }
}

/// The path already names a category directory.
///
/// Matching is plain containment of `<name>/` (or the nested `a/b/` form of `a-b`), so a
/// category name embedded in an unrelated directory name also matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathSegmentRule;

impl ClassificationRule for PathSegmentRule {
  fn name(&self) -> &'static str {
    "path-segment"
  }

  fn classify(&self, input: &RuleInput<'_>) -> Option<Category> {
    let path = input.path.replace('\\', "/");
    input
      .config
      .table(input.kind)
      .iter()
      .filter(|entry| entry.category != LEGACY_CATEGORY)
      .find(|entry| {
        category_segments(&entry.category)
          .iter()
          .any(|segment| path.contains(segment.as_str()))
      })
      .map(|entry| Category::new(entry.category.as_str()))
  }
}

/// Elements outside every semantic container are treated as legacy.
#[derive(Debug, Default, Clone, Copy)]
pub struct MissingContainerRule;

impl ClassificationRule for MissingContainerRule {
  fn name(&self) -> &'static str {
    "missing-container"
  }

  fn classify(&self, input: &RuleInput<'_>) -> Option<Category> {
    nearest_container(input.context)
      .is_none()
      .then(Category::legacy)
  }
}

/// The nearest container's classes pick the category.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerClassRule;

impl ClassificationRule for ContainerClassRule {
  fn name(&self) -> &'static str {
    "container-class"
  }

  fn classify(&self, input: &RuleInput<'_>) -> Option<Category> {
    let container = nearest_container(input.context)?;
    CONTAINER_CATEGORIES
      .iter()
      .find(|(class, _)| container.has_class(class))
      .map(|(_, category)| Category::new(*category))
  }
}

/// Infer the category from the page being rendered.
#[derive(Debug, Default, Clone, Copy)]
pub struct PagePathRule;

impl ClassificationRule for PagePathRule {
  fn name(&self) -> &'static str {
    "page-path"
  }

  fn classify(&self, input: &RuleInput<'_>) -> Option<Category> {
    PAGE_RULES
      .iter()
      .find(|rule| rule.page.matches(&input.context.page_path))
      .map(|rule| Category::new(rule.category_for(input.context)))
  }
}
