//! FakerNet web API client.
//!
//! This crate wraps a configured `reqwest::Client` and exposes the endpoints
//! the console consumes:
//!
//! | Endpoint | Method | Call |
//! |---|---|---|
//! | `api/v1/_modules/list` | GET | [`ConsoleApi::fetch_catalogue`] |
//! | `api/v1/<module>/run/<func>` | POST (form) | [`ConsoleApi::invoke`] |
//! | `api/v1/_system_data` | GET | [`ConsoleApi::fetch_system_data`] |
//! | `/api/v1/_servers/list_all` | GET | [`ConsoleApi::fetch_roster`] |
//! | `api/v1/_version` | GET | [`ConsoleApi::fetch_version`] |
//!
//! The engine talks to the server only through the [`ConsoleApi`] trait so
//! that tests can substitute scripted responses.
//!
//! # Example
//!
//! ```ignore
//! use fakernet_api::{ConsoleApi, FakerNetClient};
//! use fakernet_util::ConsoleConfig;
//!
//! async fn list() -> anyhow::Result<()> {
//!     let client = FakerNetClient::from_config(&ConsoleConfig::default())?;
//!     let catalogue = client.fetch_catalogue().await?;
//!     for module in catalogue.module_names() {
//!         println!("{module}");
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Instant;

use async_trait::async_trait;
use fakernet_types::{
    Catalogue, Envelope, Invocation, InvocationResult, RosterRow, RosterSnapshot, SystemDataResponse, SystemMetricsSnapshot,
};
use fakernet_util::http::{JsonParseError, parse_response_json_strict, status_hint};
use fakernet_util::{ConfigError, ConsoleConfig};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const CATALOGUE_PATH: &str = "api/v1/_modules/list";
pub const SYSTEM_DATA_PATH: &str = "api/v1/_system_data";
/// Absolute: resolves against the host root, not the configured base path.
pub const ROSTER_PATH: &str = "/api/v1/_servers/list_all";
pub const VERSION_PATH: &str = "api/v1/_version";

/// Errors surfaced by [`FakerNetClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The request never produced a response (connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// A non-2xx status on an endpoint whose body is not inspected.
    #[error("{url} returned HTTP {status}{}", format_hint(.hint))]
    Status {
        url: String,
        status: u16,
        hint: Option<&'static str>,
    },
    #[error(transparent)]
    Parse(#[from] JsonParseError),
    /// The envelope was readable but lacked the expected payload.
    #[error("{url}: {message}")]
    Envelope { url: String, message: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("invalid endpoint path '{path}': {source}")]
    Path {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

fn format_hint(hint: &Option<&'static str>) -> String {
    hint.map(|hint| format!(": {hint}")).unwrap_or_default()
}

/// Server operations consumed by the console engine.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// One-shot discovery of the module/function/parameter catalogue.
    async fn fetch_catalogue(&self) -> ApiResult<Catalogue>;
    /// POST the invocation args form-encoded; the body decides success.
    async fn invoke(&self, invocation: &Invocation) -> ApiResult<InvocationResult>;
    async fn fetch_system_data(&self) -> ApiResult<SystemMetricsSnapshot>;
    /// Current roster rows in server order; malformed rows are dropped.
    async fn fetch_roster(&self) -> ApiResult<Vec<RosterRow>>;
    async fn fetch_version(&self) -> ApiResult<String>;
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    version: String,
}

/// Thin wrapper around a configured `reqwest::Client` for FakerNet access.
#[derive(Debug, Clone)]
pub struct FakerNetClient {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl FakerNetClient {
    /// Build a client from resolved console settings.
    pub fn from_config(config: &ConsoleConfig) -> ApiResult<Self> {
        let base_url = config.server_url()?;
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("fnconsole/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS),
        })
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|source| ApiError::Path {
            path: path.to_string(),
            source,
        })
    }

    /// `api/v1/<module>/run/<function>`, with each name encoded as one segment.
    pub fn invocation_url(&self, module: &str, function: &str) -> ApiResult<Url> {
        let mut url = self.endpoint("api/v1/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Envelope {
                url: self.base_url.to_string(),
                message: "base URL cannot carry path segments".into(),
            })?
            .pop_if_empty()
            .extend([module, "run", function]);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%url, %method, "building request");
        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    /// Send and return `(status, body)` without judging the status.
    async fn send(&self, builder: RequestBuilder, url: &Url) -> ApiResult<(StatusCode, String)> {
        let start = Instant::now();
        let response = builder.send().await.map_err(|source| {
            warn!(%url, error = %source, duration_ms = start.elapsed().as_millis(), "http request failed");
            ApiError::Transport {
                url: url.to_string(),
                source,
            }
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, %status, body_len = body.len(), duration_ms = start.elapsed().as_millis(), "http request completed");
        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        let (status, body) = self.send(self.request(Method::GET, url.clone()), &url).await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                hint: status_hint(status.as_u16()),
            });
        }
        Ok(parse_response_json_strict(&body, Some(status.as_u16()))?)
    }

    async fn get_result<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let envelope: Envelope<T> = self.get_json(path).await?;
        let url = path.to_string();
        if envelope.reports_failure() {
            return Err(ApiError::Envelope {
                url,
                message: envelope.error.unwrap_or_else(|| "server reported a failure".into()),
            });
        }
        envelope.result.ok_or(ApiError::Envelope {
            url,
            message: "response has no 'result' field".into(),
        })
    }
}

#[async_trait]
impl ConsoleApi for FakerNetClient {
    async fn fetch_catalogue(&self) -> ApiResult<Catalogue> {
        self.get_result(CATALOGUE_PATH).await
    }

    async fn invoke(&self, invocation: &Invocation) -> ApiResult<InvocationResult> {
        let url = self.invocation_url(&invocation.module, &invocation.function)?;
        let builder = self.request(Method::POST, url.clone()).form(&invocation.args);
        let (status, body) = self.send(builder, &url).await?;
        // Only the parsed body decides the outcome, whatever the status says.
        let envelope: Envelope<Value> = parse_response_json_strict(&body, Some(status.as_u16()))?;
        Ok(InvocationResult::from(envelope))
    }

    async fn fetch_system_data(&self) -> ApiResult<SystemMetricsSnapshot> {
        let response: SystemDataResponse = self.get_json(SYSTEM_DATA_PATH).await?;
        Ok(response.into_snapshot())
    }

    async fn fetch_roster(&self) -> ApiResult<Vec<RosterRow>> {
        let snapshot: RosterSnapshot = self.get_result(ROSTER_PATH).await?;
        let rows = snapshot
            .servers
            .into_iter()
            .filter_map(|fields| match RosterRow::try_from(fields) {
                Ok(row) => Some(row),
                Err(error) => {
                    warn!(%error, "dropping malformed roster row");
                    None
                }
            })
            .collect();
        Ok(rows)
    }

    async fn fetch_version(&self) -> ApiResult<String> {
        let info: VersionInfo = self.get_result(VERSION_PATH).await?;
        Ok(info.version)
    }
}
