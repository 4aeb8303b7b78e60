use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `[access] [modifier] class|interface|enum|struct Name`
static TYPE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"\b(?:(?:public|private|protected|internal)\s+)?(?:(?:static|abstract|sealed|partial|readonly|unsafe|new)\s+)?(?:class|interface|enum|struct)\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .case_insensitive(true)
    .build()
    .expect("type declaration pattern is valid")
});

/// `namespace A.B.C` in both block and file-scoped form
static NAMESPACE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\bnamespace\s+([A-Za-z_][A-Za-z0-9_]*(?:\s*\.\s*[A-Za-z_][A-Za-z0-9_]*)*)")
        .case_insensitive(true)
        .build()
        .expect("namespace declaration pattern is valid")
});

/// A namespace declaration found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    /// Dotted path with any inner whitespace removed
    pub path: String,
    /// Byte offset of the start of the `namespace` keyword
    pub start: usize,
    /// Byte offset of the first character of the path
    pub path_start: usize,
    /// Byte offset just past the end of the path
    pub end: usize,
}

/// Extract declared type names, deduplicated, in first-seen order.
///
/// Partial types declared in several fragments yield one name.
pub fn extract_type_names(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for caps in TYPE_DECLARATION.captures_iter(content) {
        let name = &caps[1];
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}

/// Extract every namespace declaration with its span.
pub fn extract_namespaces(content: &str) -> Vec<NamespaceDecl> {
    NAMESPACE_DECLARATION
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let raw_path = caps.get(1)?;
            let path: String = raw_path
                .as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            Some(NamespaceDecl {
                path,
                start: whole.start(),
                path_start: raw_path.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// ASCII case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Replace every case-insensitive occurrence of `needle` with `replacement`.
///
/// The replacement is inserted literally (no `$` group expansion).
pub fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }

    let Ok(regex) = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    else {
        return haystack.to_string();
    };

    match regex.replace_all(haystack, NoExpand(replacement)) {
        Cow::Borrowed(_) => haystack.to_string(),
        Cow::Owned(replaced) => replaced,
    }
}

/// The leading segment of a dotted project name (`Acme.Billing` -> `Acme`).
pub fn base_name(project_name: &str) -> &str {
    project_name
        .split_once('.')
        .map_or(project_name, |(head, _)| head)
}

/// True when `path` equals `prefix` or continues it with a `.` segment.
pub fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    if path.len() < prefix.len() || !path.is_char_boundary(prefix.len()) {
        return false;
    }
    let (head, tail) = path.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix) && (tail.is_empty() || tail.starts_with('.'))
}
