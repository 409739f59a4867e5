/// Final `/`-delimited segment of `path` with any query string or fragment removed.
///
/// Backslashes are treated as separators so references authored on Windows resolve to the
/// same filename.
pub fn extract_filename(path: &str) -> &str {
    let without_suffix = path
        .split(['?', '#'])
        .next()
        .unwrap_or(path);
    without_suffix
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_suffix)
}

/// Join a category base directory and a filename with exactly one forward slash.
pub fn join_base(dir: &str, filename: &str) -> String {
    let dir = dir.replace('\\', "/");
    let dir = dir.trim_end_matches('/');
    let filename = filename.trim_start_matches('/');
    if dir.is_empty() {
        filename.to_string()
    } else {
        format!("{dir}/{filename}")
    }
}

/// Returns `true` when `path` sits directly under `root` with no further directory.
///
/// A leading `/` or `./` on `path` is ignored, and query strings do not count as segments.
pub fn is_flat_under(path: &str, root: &str) -> bool {
    let root = root.trim_start_matches("./").trim_start_matches('/');
    if root.is_empty() {
        return false;
    }
    let root = root.trim_end_matches('/');

    let path = path.trim_start_matches("./").trim_start_matches('/');
    let path = path.split(['?', '#']).next().unwrap_or(path);

    path.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}
