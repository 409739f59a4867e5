use regex::Regex;

fn external_reference_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
                Regex::new(r"^//").expect("invalid protocol-relative regex"),
                Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
                Regex::new(r"(?i)^blob:").expect("invalid blob URI regex"),
            ]
        })
        .as_slice()
}

/// Determine whether a media reference points outside the site's own asset tree.
///
/// Remote URLs and inline data cannot be relocated into a category directory, so the page
/// rewriter leaves them alone.
pub fn is_external_reference(value: &str) -> bool {
    external_reference_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value.trim()))
}

#[cfg(test)]
mod tests {
    use super::is_external_reference;

    #[test]
    fn flags_remote_urls() {
        assert!(is_external_reference("https://cdn.example.com/hero.jpg"));
        assert!(is_external_reference("HTTP://example.com/a.png"));
        assert!(is_external_reference("//cdn.example.com/a.png"));
    }

    #[test]
    fn flags_inline_data() {
        assert!(is_external_reference("data:image/png;base64,abc"));
        assert!(is_external_reference("blob:https://example.com/1234"));
    }

    #[test]
    fn keeps_site_paths() {
        assert!(!is_external_reference("assets/images/venue.jpg"));
        assert!(!is_external_reference("/assets/videos/hero.mp4"));
    }
}
