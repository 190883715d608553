// src/github/client.rs
// =============================================================================
// The HTTP client wrapper every other GitHub module goes through.
//
// Key functionality:
// - Builds URLs under a fixed API root (percent-encoding path segments)
// - Attaches the Accept header and, when we have one, a bearer token
// - Classifies responses: 2xx ok, 401/403/429 credential trouble, 404 not
//   found, anything else an API error carrying status + status text
// - Invalidates a persisted token the provider rejected
// - with_credential_retry(): ask for a new token and retry exactly once
//
// The actual network call sits behind the Transport trait so tests can
// script responses without touching the network.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::token::{TokenSource, TokenStore};
use crate::error::{GithubError, Result};

pub const USER_AGENT: &str = concat!("gh-folio/", env!("CARGO_PKG_VERSION"));

/// Which representation we ask GitHub for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// The JSON metadata envelope (the default for every endpoint)
    Json,
    /// Server-rendered HTML (README endpoint)
    Html,
    /// The file's bytes, no envelope
    Raw,
}

impl Accept {
    pub fn header_value(self) -> &'static str {
        match self {
            Accept::Json => "application/vnd.github.v3+json",
            Accept::Html => "application/vnd.github.v3.html",
            Accept::Raw => "application/vnd.github.v3.raw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a GET and hands back whatever came back, whatever the status.
/// Only failures to get a response at all are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: ApiRequest) -> Result<RawResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GithubError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut builder = self.client.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder.send().await.map_err(categorize_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body: body.to_vec(),
        })
    }
}

// reqwest errors can happen for many reasons; turn them into one readable line
fn categorize_error(error: reqwest::Error) -> GithubError {
    let error_string = error.to_string();

    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            format!("Connection failed: {}", error_string)
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    };

    GithubError::Transport(message)
}

/// Supplies a replacement credential after the provider rejected ours.
/// Returning None means the user declined.
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    async fn request_credential(&self, reason: &GithubError) -> Option<String>;
}

/// Never supplies anything (non-interactive use).
pub struct NoPrompt;

#[async_trait]
impl CredentialPrompt for NoPrompt {
    async fn request_credential(&self, _reason: &GithubError) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct GithubClient {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    api_root: Url,
    raw_root: Url,
}

impl GithubClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: TokenStore,
        api_root: Url,
        raw_root: Url,
    ) -> Result<Self> {
        for root in [&api_root, &raw_root] {
            if root.cannot_be_a_base() {
                return Err(GithubError::Decode(format!("Not a usable base URL: {}", root)));
            }
        }

        Ok(Self {
            transport,
            tokens,
            api_root,
            raw_root,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn raw_root(&self) -> &Url {
        &self.raw_root
    }

    /// API root + the given path segments, each percent-encoded.
    pub fn api_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn request(&self, url: Url, accept: Accept) -> Result<RawResponse> {
        let mut headers = vec![
            ("Accept", accept.header_value().to_string()),
            ("User-Agent", USER_AGENT.to_string()),
        ];
        if let Some(token) = self.tokens.get() {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }

        debug!("GET {} ({})", url, accept.header_value());

        let response = self
            .transport
            .get(ApiRequest {
                url: url.clone(),
                headers,
            })
            .await?;

        if response.is_success() {
            return Ok(response);
        }

        match response.status {
            401 | 403 | 429 => Err(self.credential_error(&response)?),
            404 => Err(GithubError::NotFound(url.path().to_string())),
            status => Err(GithubError::Api {
                status,
                status_text: response.status_text,
            }),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.request(url.clone(), Accept::Json).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| GithubError::Decode(format!("{}: {}", url.path(), e)))
    }

    /// Runs `op`; if it fails because the credential needs replacing, asks
    /// `prompt` for a new one and runs `op` one more time. Whatever the
    /// second attempt returns is final.
    pub async fn with_credential_retry<T, F, Fut>(
        &self,
        prompt: &dyn CredentialPrompt,
        op: F,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match op().await {
            Err(err) if err.needs_new_credential() => {
                let Some(token) = prompt.request_credential(&err).await else {
                    return Err(err);
                };
                self.tokens.set(&token)?;
                info!("Retrying once with the new credential");
                op().await
            }
            other => other,
        }
    }

    // 401/403 (and 429) all come down to "this credential won't do".
    // A persisted token is assumed bad and dropped; an environment token
    // can't be replaced from in here, so that error is final.
    fn credential_error(&self, response: &RawResponse) -> Result<GithubError> {
        let renewable = match self.tokens.source() {
            Some(TokenSource::Environment) => false,
            Some(TokenSource::Persisted) => {
                warn!("GitHub rejected the stored token (HTTP {}), clearing it", response.status);
                self.tokens.clear()?;
                true
            }
            None => true,
        };

        let rate_limited = response.status == 429
            || response.text().to_ascii_lowercase().contains("rate limit");

        Ok(if rate_limited {
            GithubError::RateLimited {
                status: response.status,
                renewable,
            }
        } else {
            GithubError::Authentication {
                status: response.status,
                renewable,
            }
        })
    }
}
