//! Console configuration persistence and resolution.
//!
//! Settings are read from a small JSON file in the standard configuration
//! directory (`~/.config/fakernet/console.json` on most platforms). A missing
//! file yields defaults; a malformed file is reported with a warning and also
//! yields defaults. `FAKERNET_URL` overrides the server address, and the CLI
//! applies its own flags last.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "FAKERNET_CONFIG_PATH";

/// Environment variable overriding the server base URL.
pub const SERVER_URL_ENV: &str = "FAKERNET_URL";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "console.json";

/// Plain HTTP port of the FakerNet server; HTTPS listens on 5051.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5050/";

/// Error surfaced when reading or validating configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure (for example, permissions).
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The base URL could not be parsed.
    #[error("invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The base URL parsed but is not usable for HTTP.
    #[error("server URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// How a poller treats a tick that fires while the previous one is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Issue the new request anyway; responses may complete out of order.
    #[default]
    Allow,
    /// Skip the tick until the in-flight request completes.
    Skip,
}

/// Persisted and resolved console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub metrics_interval_ms: u64,
    pub roster_interval_ms: u64,
    /// Skip TLS certificate verification (self-signed FakerNet CA).
    pub accept_invalid_certs: bool,
    pub overlap_policy: OverlapPolicy,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            metrics_interval_ms: 3_000,
            roster_interval_ms: 7_000,
            accept_invalid_certs: false,
            overlap_policy: OverlapPolicy::Allow,
        }
    }
}

impl ConsoleConfig {
    /// Load from `explicit_path`, `FAKERNET_CONFIG_PATH`, or the default
    /// location, then apply `FAKERNET_URL`.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        let mut config = load_payload(&path)?;
        if let Ok(url) = env::var(SERVER_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.to_string();
            }
        }
        Ok(config)
    }

    /// Parse `base_url`, insisting on http(s) and a trailing `/` so relative
    /// endpoint paths resolve beneath it.
    pub fn server_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::UnsupportedScheme(self.base_url.clone())),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms.max(1))
    }

    pub fn roster_interval(&self) -> Duration {
        Duration::from_millis(self.roster_interval_ms.max(1))
    }
}

/// Directory holding the config file and the TUI log file.
pub fn config_home() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("fakernet")
}

fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    config_home().join(CONFIG_FILE_NAME)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    match trimmed.strip_prefix("~/") {
        Some(rest) => home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest),
        None => PathBuf::from(trimmed),
    }
}

fn load_payload(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded console config");
                Ok(config)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse console config; using defaults"
                );
                Ok(ConsoleConfig::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(ConsoleConfig::default()),
        Err(error) => Err(ConfigError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = temp_env::with_var_unset(SERVER_URL_ENV, || ConsoleConfig::load(Some(&dir.path().join("absent.json"))))
            .expect("load defaults");
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.metrics_interval(), Duration::from_millis(3_000));
        assert_eq!(config.roster_interval(), Duration::from_millis(7_000));
    }

    #[test]
    fn file_values_are_merged_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"base_url":"https://fn.local:5051","overlap_policy":"skip"}}"#).expect("write config");
        let config = temp_env::with_var_unset(SERVER_URL_ENV, || ConsoleConfig::load(Some(file.path()))).expect("load");
        assert_eq!(config.base_url, "https://fn.local:5051");
        assert_eq!(config.overlap_policy, OverlapPolicy::Skip);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.server_url().expect("url").as_str(), "https://fn.local:5051/");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{not json").expect("write config");
        let config = temp_env::with_var_unset(SERVER_URL_ENV, || ConsoleConfig::load(Some(file.path()))).expect("load");
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn env_url_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = temp_env::with_var(SERVER_URL_ENV, Some("http://10.10.10.1:5050"), || {
            ConsoleConfig::load(Some(&dir.path().join("absent.json")))
        })
        .expect("load");
        assert_eq!(config.base_url, "http://10.10.10.1:5050");
    }

    #[test]
    fn rejects_non_http_schemes() {
        let config = ConsoleConfig {
            base_url: "ftp://fn.local".into(),
            ..ConsoleConfig::default()
        };
        assert!(matches!(config.server_url(), Err(ConfigError::UnsupportedScheme(_))));
    }
}
