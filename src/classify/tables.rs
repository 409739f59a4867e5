//! Fixed markup conventions of the site templates.

use crate::models::{Ancestor, ElementContext};

/// Classes marking an element as a semantic container. `<section>` always qualifies.
pub const CONTAINER_CLASSES: &[&str] = &[
  "hero",
  "featured",
  "testimonial",
  "team-member",
  "venue-card",
  "service-card",
];

/// Container class to category, checked in order; the first class present wins.
pub const CONTAINER_CATEGORIES: &[(&str, &str)] = &[
  ("hero", "homepage-hero"),
  ("featured", "homepage-featured"),
  ("testimonial", "testimonials"),
  ("team-member", "team"),
  ("venue-card", "venues-regions"),
  ("service-card", "services"),
  ("venues-intro", "venues-intro"),
  ("venues-regions", "venues-regions"),
];

/// How a page rule recognises the loaded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMatch {
  /// The page path contains the given fragment.
  Contains(&'static str),
  /// The site root: empty, `/`, or a path ending in `index.html` with nothing else matched.
  Home,
}

impl PageMatch {
  /// Returns `true` when `page_path` is recognised.
  pub fn matches(self, page_path: &str) -> bool {
    let page = page_path.trim().to_ascii_lowercase();
    match self {
      Self::Contains(fragment) => page.contains(fragment),
      Self::Home => page.is_empty() || page == "/" || page.ends_with("index.html"),
    }
  }
}

/// Page name to category, refined by the classes of enclosing elements.
#[derive(Debug, Clone, Copy)]
pub struct PageRule {
  /// Which pages the rule applies to.
  pub page: PageMatch,
  /// `(ancestor class, category)` pairs checked in order.
  pub refinements: &'static [(&'static str, &'static str)],
  /// Category used when no refinement applies.
  pub fallback: &'static str,
}

impl PageRule {
  /// Category for an element on a matching page.
  pub fn category_for(&self, context: &ElementContext) -> &'static str {
    self
      .refinements
      .iter()
      .find(|(class, _)| context.is_within(class))
      .map(|(_, category)| *category)
      .unwrap_or(self.fallback)
  }
}

/// Page rules in precedence order.
pub const PAGE_RULES: &[PageRule] = &[
  PageRule {
    page: PageMatch::Contains("venues"),
    refinements: &[("intro", "venues-intro"), ("region", "venues-regions")],
    fallback: "venues-intro",
  },
  PageRule {
    page: PageMatch::Contains("services"),
    refinements: &[],
    fallback: "services",
  },
  PageRule {
    page: PageMatch::Contains("about"),
    refinements: &[("team", "team")],
    fallback: "team",
  },
  PageRule {
    page: PageMatch::Contains("gallery"),
    refinements: &[],
    fallback: "gallery",
  },
  PageRule {
    page: PageMatch::Home,
    refinements: &[("testimonial", "testimonials")],
    fallback: "homepage-hero",
  },
];

/// Returns `true` when `ancestor` is one of the site's semantic containers.
pub fn is_semantic_container(ancestor: &Ancestor) -> bool {
  ancestor.tag == "section"
    || CONTAINER_CLASSES
      .iter()
      .any(|class| ancestor.has_class(class))
}

/// Nearest enclosing semantic container of an element.
pub fn nearest_container(context: &ElementContext) -> Option<&Ancestor> {
  context
    .ancestors
    .iter()
    .find(|ancestor| is_semantic_container(ancestor))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_nearest_container_first() {
    let context = ElementContext::new("/")
      .with_ancestor("picture", "")
      .with_ancestor("div", "testimonial quote")
      .with_ancestor("section", "reviews");

    let container = nearest_container(&context).expect("testimonial wrapper");
    assert_eq!(container.tag, "div");
    assert!(container.has_class("testimonial"));
  }

  #[test]
  fn plain_wrappers_are_not_containers() {
    let context = ElementContext::new("/")
      .with_ancestor("div", "grid")
      .with_ancestor("main", "content");
    assert!(nearest_container(&context).is_none());
  }

  #[test]
  fn home_match_accepts_root_forms() {
    assert!(PageMatch::Home.matches(""));
    assert!(PageMatch::Home.matches("/"));
    assert!(PageMatch::Home.matches("/index.html"));
    assert!(!PageMatch::Home.matches("/contact.html"));
  }

  #[test]
  fn page_rule_refines_by_ancestor_class() {
    let venues = &PAGE_RULES[0];
    let intro = ElementContext::new("/venues").with_ancestor("div", "intro");
    let region = ElementContext::new("/venues").with_ancestor("div", "region");
    let other = ElementContext::new("/venues").with_ancestor("div", "map");

    assert_eq!(venues.category_for(&intro), "venues-intro");
    assert_eq!(venues.category_for(&region), "venues-regions");
    assert_eq!(venues.category_for(&other), "venues-intro");
  }
}
