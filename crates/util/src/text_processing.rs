//! # Text Processing Utilities
//!
//! Redaction of secrets before they reach logs, sanitising of server-provided
//! text before it is drawn, and the number formats used by the status view.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement token for redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Redacts values that look like secrets in a free-form string.
///
/// # Example
/// ```rust
/// use fakernet_util::text_processing::redact_sensitive;
///
/// assert_eq!(redact_sensitive("password=hunter2 user=bob"), "password=[REDACTED] user=bob");
/// assert_eq!(redact_sensitive("Authorization: Basic Ym9iOmh1bnRlcjI="), "Authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in redact_patterns() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REDACTED}")
            })
            .into_owned();
    }
    redacted
}

fn redact_patterns() -> &'static [Regex] {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?i)(authorization:\s*)(.+)$",
            r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)[A-Z0-9_]*=)([^\s&]+)",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    });
    &PATTERNS
}

/// Render invocation arguments for logging, masking the named secret params.
pub fn redact_args<'a>(args: &IndexMap<String, String>, secret_params: impl IntoIterator<Item = &'a str>) -> String {
    let secrets: Vec<&str> = secret_params.into_iter().collect();
    let rendered: Vec<String> = args
        .iter()
        .map(|(name, value)| {
            if secrets.contains(&name.as_str()) {
                format!("{name}={REDACTED}")
            } else {
                format!("{name}={}", redact_sensitive(value))
            }
        })
        .collect();
    format!("{{{}}}", rendered.join(", "))
}

/// Escape control characters so server text cannot drive the terminal.
///
/// Newlines and tabs are kept; every other control character is replaced by
/// its `\u{..}` escape.
pub fn escape_control_chars(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_control() && ch != '\n' && ch != '\t' {
            escaped.extend(ch.escape_unicode());
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

/// Bytes to gigabytes (binary), two decimals.
pub fn format_gigabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0 / 1024.0)
}

/// `"<used> GB/<total> GB"` as shown beside the memory and disk gauges.
pub fn format_usage(used: u64, total: u64) -> String {
    format!("{} GB/{} GB", format_gigabytes(used), format_gigabytes(total))
}

/// Percentage with two decimals, no unit.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}")
}
