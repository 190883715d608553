// src/state/mod.rs
// =============================================================================
// Persisted client state.
//
// A browser keeps this kind of thing in local storage; we keep it in a small
// JSON file. The keys are fixed:
//   github_token  - credential typed in by the user (never the env one)
//   theme         - light / dark
//   custom_links  - ordered list of user-defined links
//   link_order    - page url -> ordered list of link urls
//   hidden_links  - page url -> link urls hidden on that page
//
// Every mutation is written straight to disk. StateStore is cheap to clone;
// clones share the same state.
// =============================================================================

mod links;

pub use links::CustomLink;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("State file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid link operation: {0}")]
    InvalidLink(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// On-disk shape of the state file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    pub theme: Theme,
    pub custom_links: Vec<CustomLink>,
    pub link_order: BTreeMap<String, Vec<String>>,
    pub hidden_links: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct StateStore {
    inner: Arc<RwLock<ClientState>>,
    // None = in-memory only
    path: Option<PathBuf>,
}

impl StateStore {
    /// Loads the state file, treating a missing file as empty state.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => ClientState::default(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StateError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ClientState::default(),
            Err(source) => return Err(StateError::Io { path, source }),
        };

        debug!("Loaded client state from {}", path.display());

        Ok(Self {
            inner: Arc::new(RwLock::new(state)),
            path: Some(path),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ClientState::default())),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ClientState {
        self.read(|state| state.clone())
    }

    /// The stored token; a blank one (hand-edited file) counts as none.
    pub fn token(&self) -> Option<String> {
        self.read(|state| {
            state
                .github_token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
    }

    pub fn set_token(&self, token: Option<String>) -> Result<(), StateError> {
        self.update(|state| {
            state.github_token = token;
            Ok(())
        })
    }

    pub fn theme(&self) -> Theme {
        self.read(|state| state.theme)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StateError> {
        self.update(|state| {
            state.theme = theme;
            Ok(())
        })
    }

    fn read<T>(&self, f: impl FnOnce(&ClientState) -> T) -> T {
        // A poisoned lock still holds usable data; nothing here panics mid-write
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Applies a mutation and writes the result through to disk.
    /// The in-memory state is only changed if `f` succeeds.
    fn update<T>(
        &self,
        f: impl FnOnce(&mut ClientState) -> Result<T, StateError>,
    ) -> Result<T, StateError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, state: &ClientState) -> Result<(), StateError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StateError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(state).map_err(|source| StateError::Json {
            path: path.clone(),
            source,
        })?;

        std::fs::write(path, json).map_err(|source| StateError::Io {
            path: path.clone(),
            source,
        })
    }
}
