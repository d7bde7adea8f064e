//! Decoding of FakerNet response bodies.
//!
//! The server answers every console endpoint with JSON, but proxies and
//! misconfigured URLs hand back HTML error pages. Decoding failures therefore
//! keep the status code and a short whitespace-collapsed excerpt of the body.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Characters of body kept in a [`JsonParseError`].
pub const PREVIEW_CHARS: usize = 200;

/// A response body that did not decode into the expected JSON shape.
#[derive(Debug, Error)]
#[error("unexpected response body ({}): {source}; body: {preview}", describe_status(.status))]
pub struct JsonParseError {
    status: Option<u16>,
    #[source]
    source: serde_json::Error,
    preview: String,
}

impl JsonParseError {
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "no status".to_string(),
    }
}

/// Hint for status codes the console commonly hits when pointed at the wrong place.
///
/// ```rust
/// use fakernet_util::http::status_hint;
///
/// assert!(status_hint(404).is_some_and(|hint| hint.contains("Not Found")));
/// assert!(status_hint(500).is_none());
/// ```
pub fn status_hint(status: u16) -> Option<&'static str> {
    match status {
        401 | 403 => Some("Unauthorized; the server skips authentication only for loopback clients"),
        404 => Some("Not Found; check that the URL points at a FakerNet web server"),
        _ => None,
    }
}

/// Decode `body` as `T`. `status` only decorates the error.
pub fn parse_response_json_strict<T: DeserializeOwned>(body: &str, status: Option<u16>) -> Result<T, JsonParseError> {
    serde_json::from_str(body).map_err(|source| JsonParseError {
        status,
        source,
        preview: body_preview(body),
    })
}

fn body_preview(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "<empty>".to_string();
    }
    match collapsed.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}
