// src/github/token.rs
// =============================================================================
// Holds the (at most one) GitHub credential.
//
// Two sources, in priority order:
// 1. The environment (GITHUB_TOKEN / --token). Managed outside the process,
//    so nothing here ever overwrites or clears it.
// 2. The persisted client state, typed in by the user when asked.
//
// set() and clear() only ever touch the persisted value.
// =============================================================================

use crate::state::{StateError, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Persisted,
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    env_token: Option<String>,
    state: StateStore,
}

impl TokenStore {
    pub fn new(env_token: Option<String>, state: StateStore) -> Self {
        // An empty GITHUB_TOKEN= is the same as not setting it
        let env_token = env_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { env_token, state }
    }

    pub fn get(&self) -> Option<String> {
        self.env_token.clone().or_else(|| self.state.token())
    }

    /// Where the token `get()` would return comes from.
    pub fn source(&self) -> Option<TokenSource> {
        if self.env_token.is_some() {
            Some(TokenSource::Environment)
        } else if self.state.token().is_some() {
            Some(TokenSource::Persisted)
        } else {
            None
        }
    }

    /// Stores a typed-in token. A blank value clears the stored one.
    pub fn set(&self, value: &str) -> Result<(), StateError> {
        let value = value.trim();
        if value.is_empty() {
            return self.clear();
        }
        self.state.set_token(Some(value.to_string()))
    }

    pub fn clear(&self) -> Result<(), StateError> {
        self.state.set_token(None)
    }
}
