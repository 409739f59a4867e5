//! Ordered classification of media references into component categories.
//!
//! Precedence is the order of the rule list: a flat legacy path, a category directory
//! already present in the path, a missing semantic container, the container's classes,
//! and finally the page being rendered. When no rule matches the reference is `legacy`.

mod rules;
pub mod tables;

pub use rules::{
  ClassificationRule, ContainerClassRule, LegacyRootRule, MissingContainerRule, PagePathRule,
  PathSegmentRule, RuleInput,
};

use crate::models::Category;

/// First-match-wins chain of [`ClassificationRule`]s.
pub struct Classifier {
  rules: Vec<Box<dyn ClassificationRule>>,
}

impl Classifier {
  /// Chain built from an explicit rule list.
  pub fn new(rules: Vec<Box<dyn ClassificationRule>>) -> Self {
    Self { rules }
  }

  /// The site's standard rule chain.
  pub fn standard() -> Self {
    Self::new(vec![
      Box::new(LegacyRootRule),
      Box::new(PathSegmentRule),
      Box::new(MissingContainerRule),
      Box::new(ContainerClassRule),
      Box::new(PagePathRule),
    ])
  }

  /// Category of the first matching rule, or `legacy`.
  pub fn classify(&self, input: &RuleInput<'_>) -> Category {
    for rule in &self.rules {
      if let Some(category) = rule.classify(input) {
        tracing::trace!(rule = rule.name(), %category, path = input.path, "classified");
        return category;
      }
    }
    Category::legacy()
  }

  /// Names of the configured rules in evaluation order.
  pub fn rule_names(&self) -> Vec<&'static str> {
    self.rules.iter().map(|rule| rule.name()).collect()
  }
}

impl Default for Classifier {
  fn default() -> Self {
    Self::standard()
  }
}

impl std::fmt::Debug for Classifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Classifier")
      .field("rules", &self.rule_names())
      .finish()
  }
}
