// src/github/testing.rs
// Scripted transport for unit tests. Responses are queued per URL; the last
// queued response for a URL repeats once the queue is down to one entry.
// Unknown URLs answer 404.

use async_trait::async_trait;
use base64::Engine;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use url::Url;

use super::client::{ApiRequest, GithubClient, RawResponse, Transport};
use super::token::TokenStore;
use crate::error::{GithubError, Result};

pub(crate) const API: &str = "https://api.github.com";
pub(crate) const RAW: &str = "https://raw.githubusercontent.com";

type Scripted = std::result::Result<RawResponse, String>;

#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        self.push(
            url,
            Ok(RawResponse {
                status,
                status_text,
                body: body.into(),
            }),
        );
    }

    pub(crate) fn fail(&self, url: &str, message: &str) {
        self.push(url, Err(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn hits(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }

    fn push(&self, url: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, request: ApiRequest) -> Result<RawResponse> {
        let key = request.url.as_str().to_string();
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let scripted = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(GithubError::Transport(message)),
            None => Ok(RawResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: br#"{"message":"Not Found"}"#.to_vec(),
            }),
        }
    }
}

pub(crate) fn client_with(fake: Arc<FakeTransport>, tokens: TokenStore) -> GithubClient {
    GithubClient::new(
        fake,
        tokens,
        Url::parse(API).unwrap(),
        Url::parse(RAW).unwrap(),
    )
    .unwrap()
}

pub(crate) fn anonymous_client(fake: Arc<FakeTransport>) -> GithubClient {
    client_with(fake, TokenStore::new(None, crate::state::StateStore::in_memory()))
}

/// A contents-API file envelope, base64 wrapped at 60 columns the way
/// GitHub sends it.
pub(crate) fn file_envelope(name: &str, path: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    let wrapped = encoded
        .as_bytes()
        .chunks(60)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect::<Vec<_>>()
        .join("\n");

    serde_json::json!({
        "name": name,
        "path": path,
        "type": "file",
        "size": bytes.len(),
        "download_url": format!("{}/alice/repo/main/{}", RAW, path),
        "content": wrapped,
        "encoding": "base64",
    })
    .to_string()
}
