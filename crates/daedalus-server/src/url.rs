//! Prefix normalization and prefix stripping.

/// Normalizes a controller prefix or request path.
///
/// `"/"` and `""` become `"/"`; anything else loses one trailing slash and
/// gains a leading slash if it has none.
///
/// ```
/// use daedalus_server::normalize_url;
///
/// assert_eq!(normalize_url("v1"), "/v1");
/// assert_eq!(normalize_url("/v1/"), "/v1");
/// assert_eq!(normalize_url("/"), "/");
/// ```
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Absolute prefix of a child mounted at `url` under `parent`.
pub(crate) fn child_prefix(parent: &str, url: &str) -> String {
    let url = normalize_url(url);
    match (parent, url.as_str()) {
        (parent, "/") => parent.to_string(),
        ("/", url) => url.to_string(),
        (parent, url) => format!("{parent}{url}"),
    }
}

/// The part of `uri` below `prefix`, or `None` if `prefix` does not cover it.
///
/// Both must be normalized. A prefix covers a URI only at a segment
/// boundary, so `/v1` covers `/v1` and `/v1/login` but not `/v10`.
pub(crate) fn relative_uri<'a>(prefix: &str, uri: &'a str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(uri.strip_prefix('/').unwrap_or(uri));
    }
    let rest = uri.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}
