//! URL handling for request classification and cache keys.

use url::{Origin, Url};

/// Schemes used by browser extensions; requests with these are never handled.
pub const EXTENSION_SCHEMES: &[&str] = &[
    "chrome-extension",
    "moz-extension",
    "safari-extension",
    "safari-web-extension",
];

/// Error type for URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse a request URL, resolving origin-relative paths against `origin`.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Resolve inputs starting with `/` against the origin
/// 3. Keep any scheme so non-HTTP requests can be classified
pub fn parse_request_url(input: &str, origin: &Url) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        return origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()));
    }

    Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}

/// Whether the worker may intercept this URL at all.
pub fn is_interceptable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && !EXTENSION_SCHEMES.contains(&url.scheme())
}

/// Whether `url` belongs to `origin` (scheme, host and port all equal).
pub fn is_same_origin(url: &Url, origin: &Origin) -> bool {
    &url.origin() == origin
}
