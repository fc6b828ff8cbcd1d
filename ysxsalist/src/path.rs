//! Path helpers for AList remote paths
//!
//! AList paths are `/`-separated and absolute. Configuration values are
//! written by hand, so they regularly miss a leading separator or carry a
//! trailing one; these helpers normalise them before they reach the API or
//! an URL.

/// Remote path separator
pub const SEPARATOR: &str = "/";

/// Removes one leading occurrence of `keyword`
pub fn remove_start<'a>(content: &'a str, keyword: &str) -> &'a str {
    content.strip_prefix(keyword).unwrap_or(content)
}

/// Removes one trailing occurrence of `keyword`
pub fn remove_end<'a>(content: &'a str, keyword: &str) -> &'a str {
    content.strip_suffix(keyword).unwrap_or(content)
}

/// Removes one leading and one trailing occurrence of `keyword`
pub fn remove_border<'a>(content: &'a str, keyword: &str) -> &'a str {
    remove_end(remove_start(content, keyword), keyword)
}

/// Prepends `keyword` unless `content` already starts with it
pub fn complete_start(content: &str, keyword: &str) -> String {
    if content.starts_with(keyword) {
        content.to_string()
    } else {
        format!("{}{}", keyword, content)
    }
}

/// Appends `keyword` unless `content` already ends with it
pub fn complete_end(content: &str, keyword: &str) -> String {
    if content.ends_with(keyword) {
        content.to_string()
    } else {
        format!("{}{}", content, keyword)
    }
}

/// Ensures `content` starts and ends with `keyword`
pub fn complete_border(content: &str, keyword: &str) -> String {
    complete_end(&complete_start(content, keyword), keyword)
}

/// Normalises a remote path to the absolute form the API expects
///
/// Adds the leading separator and drops a trailing one. The root stays `/`.
///
/// ```
/// use ysxsalist::path::absolute;
///
/// assert_eq!(absolute("books/three-body/"), "/books/three-body");
/// assert_eq!(absolute("/"), "/");
/// assert_eq!(absolute(""), "/");
/// ```
pub fn absolute(path: &str) -> String {
    let path = complete_start(path.trim(), SEPARATOR);
    if path.len() > SEPARATOR.len() {
        remove_end(&path, SEPARATOR).to_string()
    } else {
        path
    }
}

/// Joins an album root and a sub-directory into one absolute path
///
/// ```
/// use ysxsalist::path::join;
///
/// assert_eq!(join("/books/three-body", "/track"), "/books/three-body/track");
/// assert_eq!(join("/books/three-body/", "track"), "/books/three-body/track");
/// assert_eq!(join("/books/three-body", ""), "/books/three-body");
/// ```
pub fn join(root: &str, child: &str) -> String {
    let child = remove_border(child.trim(), SEPARATOR);
    if child.is_empty() {
        return absolute(root);
    }
    let root = absolute(root);
    if root == SEPARATOR {
        format!("{}{}", SEPARATOR, child)
    } else {
        format!("{}{}{}", root, SEPARATOR, child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_helpers() {
        assert_eq!(remove_start("/track", "/"), "track");
        assert_eq!(remove_start("track", "/"), "track");
        assert_eq!(remove_end("/track/", "/"), "/track");
        assert_eq!(remove_border("/track/", "/"), "track");
        assert_eq!(remove_border("//track//", "/"), "/track/");
        assert_eq!(remove_border("/", "/"), "");
    }

    #[test]
    fn test_complete_helpers() {
        assert_eq!(complete_start("track", "/"), "/track");
        assert_eq!(complete_start("/track", "/"), "/track");
        assert_eq!(complete_end("track", "/"), "track/");
        assert_eq!(complete_border("track", "/"), "/track/");
        assert_eq!(complete_border("/track/", "/"), "/track/");
    }

    #[test]
    fn test_absolute() {
        assert_eq!(absolute("/books/a/"), "/books/a");
        assert_eq!(absolute("books/a"), "/books/a");
        assert_eq!(absolute("  /books/a  "), "/books/a");
        assert_eq!(absolute("/"), "/");
    }

    #[test]
    fn test_join_from_root() {
        assert_eq!(join("/", "track"), "/track");
        assert_eq!(join("", "/bonus/"), "/bonus");
    }
}
