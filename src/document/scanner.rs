//! Tag-level scanning of rendered HTML for media attributes.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::asset_paths::is_external_reference;
use crate::models::{Ancestor, ElementContext, MediaKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Class marking a testimonial block, used for preview attributes.
const TESTIMONIAL_CLASS: &str = "testimonial";

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("invalid tag regex")
    })
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("invalid attribute regex")
    })
}

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"))
}

/// What a scanned attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRole {
    /// A `src` attribute resolved against the given table.
    Source(MediaKind),
    /// A bare preview filename.
    Preview {
        /// The element sits inside (or is) a testimonial block.
        in_testimonial: bool,
    },
}

/// A media attribute found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttribute {
    /// Lowercase tag name of the element carrying the attribute.
    pub tag: String,
    /// How the value should be resolved.
    pub role: AttributeRole,
    /// Attribute value as authored.
    pub value: String,
    /// Byte range of the value within the document.
    pub span: Range<usize>,
    /// `false` for unquoted attribute values.
    pub quoted: bool,
    /// Position of the element in the page.
    pub context: ElementContext,
}

#[derive(Debug)]
struct RawAttribute<'a> {
    name: String,
    value: &'a str,
    span: Range<usize>,
    quoted: bool,
}

/// Collect media attributes from `html` in document order.
///
/// Elements inside comments and raw-text elements (`<script>`, `<style>`) are ignored, as
/// are references to remote URLs or inline data.
pub fn scan_media_attributes(
    html: &str,
    page_path: &str,
    preview_attribute: &str,
) -> Vec<MediaAttribute> {
    let comments: Vec<Range<usize>> = comment_pattern()
        .find_iter(html)
        .map(|found| found.range())
        .collect();
    let preview_attribute = preview_attribute.to_ascii_lowercase();

    let mut stack: Vec<Ancestor> = Vec::new();
    let mut raw_text: Option<String> = None;
    let mut found = Vec::new();

    for caps in tag_pattern().captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if comments.iter().any(|range| range.contains(&whole.start())) {
            continue;
        }

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();

        if let Some(raw) = &raw_text {
            if closing && *raw == name {
                raw_text = None;
            }
            continue;
        }

        if closing {
            if let Some(position) = stack.iter().rposition(|ancestor| ancestor.tag == name) {
                stack.truncate(position);
            }
            continue;
        }

        let (attrs_text, attrs_offset) = caps
            .get(3)
            .map(|m| (m.as_str(), m.start()))
            .unwrap_or(("", whole.end()));
        let attributes = parse_attributes(attrs_text, attrs_offset);
        let self_closing = attrs_text.trim_end().ends_with('/');

        let class_attr = attributes
            .iter()
            .find(|attr| attr.name == "class")
            .map(|attr| attr.value)
            .unwrap_or("");
        let element = Ancestor::new(&name, class_attr);

        let context = ElementContext {
            page_path: page_path.to_string(),
            ancestors: stack.iter().rev().cloned().collect(),
        };

        for attr in &attributes {
            let role = if attr.name == "src" {
                source_kind(&name, &context).map(AttributeRole::Source)
            } else if attr.name == preview_attribute {
                Some(AttributeRole::Preview {
                    in_testimonial: element.has_class(TESTIMONIAL_CLASS)
                        || context.is_within(TESTIMONIAL_CLASS),
                })
            } else {
                None
            };

            let Some(role) = role else {
                continue;
            };
            if is_external_reference(attr.value) {
                continue;
            }

            found.push(MediaAttribute {
                tag: name.clone(),
                role,
                value: attr.value.to_string(),
                span: attr.span.clone(),
                quoted: attr.quoted,
                context: context.clone(),
            });
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing {
            raw_text = Some(name);
        } else if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            stack.push(element);
        }
    }

    found
}

fn source_kind(tag: &str, context: &ElementContext) -> Option<MediaKind> {
    match tag {
        "img" => Some(MediaKind::Images),
        "video" => Some(MediaKind::Videos),
        "source" if context.parent_tag() == Some("picture") => Some(MediaKind::Images),
        "source" => Some(MediaKind::Videos),
        _ => None,
    }
}

fn parse_attributes(text: &str, offset: usize) -> Vec<RawAttribute<'_>> {
    let mut attributes = Vec::new();
    for caps in attribute_pattern().captures_iter(text) {
        let Some(name) = caps.get(1) else {
            continue;
        };

        let (value, quoted) = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(value), _, _) | (_, Some(value), _) => (Some(value), true),
            (_, _, Some(value)) => (Some(value), false),
            _ => (None, true),
        };

        let Some(value) = value else {
            continue;
        };

        attributes.push(RawAttribute {
            name: name.as_str().to_ascii_lowercase(),
            value: value.as_str(),
            span: offset + value.start()..offset + value.end(),
            quoted,
        });
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ancestor_chain_nearest_first() {
        let html = r#"<main><section class="reviews"><div class="testimonial card"><img src="a.jpg"></div></section></main>"#;
        let found = scan_media_attributes(html, "/index.html", "data-preview");

        assert_eq!(found.len(), 1);
        let attr = &found[0];
        assert_eq!(attr.value, "a.jpg");
        assert_eq!(&html[attr.span.clone()], "a.jpg");
        assert_eq!(attr.role, AttributeRole::Source(MediaKind::Images));
        let tags: Vec<&str> = attr
            .context
            .ancestors
            .iter()
            .map(|ancestor| ancestor.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["div", "section", "main"]);
        assert_eq!(attr.context.page_path, "/index.html");
    }

    #[test]
    fn closing_tags_pop_the_stack() {
        let html = r#"<div class="hero"><p>intro</p></div><img src='b.jpg'>"#;
        let found = scan_media_attributes(html, "/", "data-preview");

        assert_eq!(found.len(), 1);
        assert!(found[0].context.ancestors.is_empty());
        assert!(found[0].quoted);
    }

    #[test]
    fn distinguishes_picture_and_video_sources() {
        let html = r#"<picture><source src="p.webp"><img src="p.jpg"></picture><video poster="x.jpg"><source src="v.mp4"></video><video src=hero.mp4></video>"#;
        let roles: Vec<(String, AttributeRole, bool)> =
            scan_media_attributes(html, "/", "data-preview")
                .into_iter()
                .map(|attr| (attr.value, attr.role, attr.quoted))
                .collect();

        assert_eq!(roles, vec![
            ("p.webp".to_string(), AttributeRole::Source(MediaKind::Images), true),
            ("p.jpg".to_string(), AttributeRole::Source(MediaKind::Images), true),
            ("v.mp4".to_string(), AttributeRole::Source(MediaKind::Videos), true),
            ("hero.mp4".to_string(), AttributeRole::Source(MediaKind::Videos), false),
        ]);
    }

    #[test]
    fn preview_attribute_checks_own_and_enclosing_classes() {
        let html = r#"<div class="testimonial" data-preview="own.mp4"></div><section class="testimonial"><button data-preview="nested.mp4">Play</button></section><button DATA-PREVIEW="plain.mp4"></button>"#;
        let found = scan_media_attributes(html, "/", "data-preview");
        let roles: Vec<AttributeRole> = found.iter().map(|attr| attr.role).collect();

        assert_eq!(roles, vec![
            AttributeRole::Preview { in_testimonial: true },
            AttributeRole::Preview { in_testimonial: true },
            AttributeRole::Preview { in_testimonial: false },
        ]);
    }

    #[test]
    fn ignores_comments_scripts_and_remote_urls() {
        let html = r#"<!-- <img src="commented.jpg"> --><script>const t = '<img src="inline.jpg">';</script><img src="https://cdn.example.com/a.jpg"><img src="data:image/png;base64,AA"><img src="kept.jpg">"#;
        let found = scan_media_attributes(html, "/", "data-preview");

        let values: Vec<&str> = found.iter().map(|attr| attr.value.as_str()).collect();
        assert_eq!(values, vec!["kept.jpg"]);
    }

    #[test]
    fn unmatched_closing_tags_are_ignored() {
        let html = r#"<section class="hero"></span><img src="c.jpg"></section>"#;
        let found = scan_media_attributes(html, "/", "data-preview");
        assert_eq!(found[0].context.ancestors.len(), 1);
        assert!(found[0].context.ancestors[0].has_class("hero"));
    }
}
