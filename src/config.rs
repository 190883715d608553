// src/config.rs
// =============================================================================
// Runtime configuration and the wiring that turns it into a GithubClient.
//
// Values come from command-line flags, which fall back to environment
// variables (see cli.rs). Anything not given uses the defaults below.
// =============================================================================

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{GithubError, Result};
use crate::github::{GithubClient, ReqwestTransport, TokenStore};
use crate::state::StateStore;

pub const DEFAULT_API_ROOT: &str = "https://api.github.com";
pub const DEFAULT_RAW_ROOT: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_root: Url,
    pub raw_root: Url,
    /// Externally managed credential (GITHUB_TOKEN). Never persisted.
    pub env_token: Option<String>,
    pub state_file: PathBuf,
    pub timeout: Duration,
    /// How many repositories are enriched at once
    pub concurrency: usize,
}

impl Config {
    pub fn new(
        api_root: &str,
        raw_root: &str,
        env_token: Option<String>,
        state_file: Option<PathBuf>,
        timeout_secs: u64,
        concurrency: usize,
    ) -> Result<Self> {
        Ok(Self {
            api_root: parse_root(api_root)?,
            raw_root: parse_root(raw_root)?,
            env_token,
            state_file: state_file.unwrap_or_else(default_state_file),
            timeout: Duration::from_secs(timeout_secs.max(1)),
            concurrency: concurrency.max(1),
        })
    }

    /// Opens the state file and builds a client over real HTTP.
    pub fn connect(&self) -> Result<(GithubClient, StateStore)> {
        let state = StateStore::open(&self.state_file)?;
        let tokens = TokenStore::new(self.env_token.clone(), state.clone());
        let transport = Arc::new(ReqwestTransport::new(self.timeout)?);
        let client = GithubClient::new(
            transport,
            tokens,
            self.api_root.clone(),
            self.raw_root.clone(),
        )?;
        Ok((client, state))
    }
}

fn parse_root(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| GithubError::Decode(format!("Invalid base URL '{}': {}", raw, e)))
}

/// `<platform config dir>/state.json`, or `.gh-folio/state.json` when the
/// platform has no notion of one.
pub fn default_state_file() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("dev", "gh-folio", "gh-folio") {
        dirs.config_dir().join("state.json")
    } else {
        PathBuf::from(".gh-folio").join("state.json")
    }
}
