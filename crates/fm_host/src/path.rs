//! Relative-path helpers shared by the listing controller, the transport, and the memory server.
//!
//! Paths on the wire are slash-joined and relative to the storage root: no leading or trailing
//! slash, and the empty string names the root itself.

/// Normalizes a root-relative path.
///
/// Trims whitespace, converts backslashes to `/`, drops empty and `.` segments, resolves `..`
/// without escaping the root, and strips leading/trailing slashes.
pub fn normalize_relative_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let converted = path.trim().replace('\\', "/");
    for segment in converted.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Joins `name` under the directory `parent`.
pub fn join_relative_path(parent: &str, name: &str) -> String {
    let parent = normalize_relative_path(parent);
    let name = name.trim_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Returns the parent directory of `path`, or `None` for the root.
pub fn parent_relative_path(path: &str) -> Option<String> {
    let normalized = normalize_relative_path(path);
    if normalized.is_empty() {
        return None;
    }
    Some(match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    })
}

/// Returns the final segment of `path`.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One navigable crumb of the current directory path.
pub struct Breadcrumb {
    /// Segment label.
    pub name: String,
    /// Root-relative path up to and including this segment.
    pub path: String,
}

/// Splits `path` into cumulative breadcrumbs (`a/b` -> `a`, `a/b`).
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let normalized = normalize_relative_path(path);
    let mut crumbs = Vec::new();
    let mut acc = String::new();
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        if !acc.is_empty() {
            acc.push('/');
        }
        acc.push_str(segment);
        crumbs.push(Breadcrumb {
            name: segment.to_string(),
            path: acc.clone(),
        });
    }
    crumbs
}

/// Returns `true` when `candidate` is `ancestor` or lies beneath it.
pub fn is_same_or_descendant(candidate: &str, ancestor: &str) -> bool {
    let candidate = normalize_relative_path(candidate);
    let ancestor = normalize_relative_path(ancestor);
    if ancestor.is_empty() {
        return true;
    }
    candidate == ancestor || candidate.starts_with(&format!("{ancestor}/"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_relative_path_matches_expected_cases() {
        let cases = [
            ("", ""),
            ("   ", ""),
            ("/", ""),
            ("docs/notes", "docs/notes"),
            ("/docs//notes/", "docs/notes"),
            ("./docs/../media", "media"),
            ("\\docs\\notes", "docs/notes"),
            ("/../../", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_relative_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn join_and_parent_are_root_aware() {
        assert_eq!(join_relative_path("", "a.txt"), "a.txt");
        assert_eq!(join_relative_path("/docs/", "a.txt"), "docs/a.txt");
        assert_eq!(parent_relative_path("docs/a.txt"), Some("docs".to_string()));
        assert_eq!(parent_relative_path("a.txt"), Some(String::new()));
        assert_eq!(parent_relative_path(""), None);
        assert_eq!(file_name("docs/a.txt"), "a.txt");
        assert_eq!(file_name("a.txt"), "a.txt");
    }

    #[test]
    fn breadcrumbs_accumulate_segments() {
        let crumbs = breadcrumbs("a/b/c");
        let paths: Vec<&str> = crumbs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/b/c"]);
        assert!(breadcrumbs("").is_empty());
    }

    #[test]
    fn descendant_check_does_not_match_sibling_prefixes() {
        assert!(is_same_or_descendant("docs/old", "docs"));
        assert!(is_same_or_descendant("docs", "docs"));
        assert!(!is_same_or_descendant("docs2", "docs"));
        assert!(is_same_or_descendant("anything", ""));
    }
}
