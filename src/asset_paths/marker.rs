/// Returns `true` when `value` already carries the cache-busting `marker`.
///
/// The marker only counts as a whole query parameter, so `?nodynamic=true` is not marked.
pub fn has_marker(value: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }

    let without_fragment = value.split_once('#').map_or(value, |(path, _)| path);
    without_fragment
        .split_once('?')
        .is_some_and(|(_, query)| query.split('&').any(|param| param == marker))
}

/// Append `marker` as a query parameter, extending an existing query string if present.
pub fn append_marker(value: &str, marker: &str) -> String {
    if marker.is_empty() {
        return value.to_string();
    }

    let (path, fragment) = match value.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (value, None),
    };
    let separator = if path.contains('?') { '&' } else { '?' };

    match fragment {
        Some(fragment) => format!("{path}{separator}{marker}#{fragment}"),
        None => format!("{path}{separator}{marker}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_query_marker() {
        assert_eq!(
            append_marker("assets/images/venue.jpg", "dynamic=true"),
            "assets/images/venue.jpg?dynamic=true"
        );
    }

    #[test]
    fn extends_existing_query_and_keeps_fragment() {
        assert_eq!(
            append_marker("hero.mp4?v=2#t=5", "dynamic=true"),
            "hero.mp4?v=2&dynamic=true#t=5"
        );
    }

    #[test]
    fn detects_marker() {
        assert!(has_marker("a.jpg?dynamic=true", "dynamic=true"));
        assert!(!has_marker("a.jpg?v=1", "dynamic=true"));
        assert!(!has_marker("a.jpg", ""));
    }

    #[test]
    fn marker_must_be_a_whole_query_parameter() {
        assert!(has_marker("a.jpg?v=2&dynamic=true", "dynamic=true"));
        assert!(has_marker("a.jpg?dynamic=true#t=1", "dynamic=true"));
        assert!(!has_marker("x.jpg?nodynamic=true", "dynamic=true"));
        assert!(!has_marker("x.jpg?dynamic=true2", "dynamic=true"));
        assert!(!has_marker("dynamic=true/x.jpg", "dynamic=true"));
        assert!(!has_marker("x.jpg#dynamic=true", "dynamic=true"));
    }
}
