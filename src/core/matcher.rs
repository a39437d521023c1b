//! Keyword matching against stored paths.

/// Returns true when `path` matches `keywords`.
///
/// Matching is case-insensitive and scans right to left: the last keyword has
/// to occur inside the final path component, and every earlier keyword has to
/// occur strictly before the match of the keyword that follows it. An empty
/// keyword list matches every path.
pub fn matches(path: &str, keywords: &[impl AsRef<str>]) -> bool {
    let Some((last, rest)) = keywords.split_last() else {
        return true;
    };
    if path.is_empty() {
        return false;
    }

    let path = path.to_lowercase();
    let trimmed = path.trim_end_matches('/');
    let component_start = trimmed.rfind('/').map_or(0, |i| i + 1);

    let last = last.as_ref().to_lowercase();
    let Some(found) = trimmed[component_start..].rfind(&last) else {
        return false;
    };
    let mut boundary = component_start + found;

    for keyword in rest.iter().rev() {
        let keyword = keyword.as_ref().to_lowercase();
        match path[..boundary].rfind(&keyword) {
            Some(idx) => boundary = idx,
            None => return false,
        }
    }
    true
}
