use std::collections::BTreeSet;

/// Expand a category name into the path fragments it may appear as.
///
/// The literal name always matches (`venues-intro/`). Hyphenated names also match their
/// nested directory form (`venues/intro/`). Fragments are returned in that order without
/// duplicates.
pub fn category_segments(category: &str) -> Vec<String> {
    let name = category.trim_matches('/');
    if name.is_empty() {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    let mut result = Vec::new();
    for candidate in [format!("{name}/"), format!("{}/", name.replace('-', "/"))] {
        if seen.insert(candidate.clone()) {
            result.push(candidate);
        }
    }
    result
}
