// src/error.rs
// =============================================================================
// Error types for the library side of gh-folio.
//
// GithubError covers everything that can go wrong talking to the GitHub API:
// - Transport: the request never got an answer (DNS, timeout, TLS)
// - Authentication / RateLimited: 401, 403 or 429 from the provider
// - NotFound: 404
// - Api: any other non-2xx status
// - Decode: a payload arrived but was not valid JSON / base64
// - EmptyRepository: no branches, so nothing to browse
//
// The binary wraps these in anyhow::Error; the library keeps them typed so
// callers can match on them (the credential retry flow depends on that).
// =============================================================================

use thiserror::Error;

use crate::state::StateError;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// `renewable` is false when the rejected credential came from the
    /// environment, which runtime code can't replace.
    #[error("Authentication rejected (HTTP {status})")]
    Authentication { status: u16, renewable: bool },

    #[error("Rate limited (HTTP {status})")]
    RateLimited { status: u16, renewable: bool },

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("GitHub API error: HTTP {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Repository {0} is empty (no branches)")]
    EmptyRepository(String),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GithubError {
    /// True for 401/403 outcomes where a fresh credential might help.
    pub fn needs_new_credential(&self) -> bool {
        matches!(
            self,
            GithubError::Authentication { renewable: true, .. }
                | GithubError::RateLimited { renewable: true, .. }
        )
    }

    /// True for errors the UI shows as an empty state rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GithubError::NotFound(_) | GithubError::EmptyRepository(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GithubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_renewable_rejections_ask_for_credentials() {
        assert!(GithubError::Authentication { status: 401, renewable: true }.needs_new_credential());
        assert!(GithubError::RateLimited { status: 403, renewable: true }.needs_new_credential());
        assert!(!GithubError::Authentication { status: 403, renewable: false }.needs_new_credential());
        assert!(!GithubError::NotFound("x".into()).needs_new_credential());
    }

    #[test]
    fn test_api_error_message_carries_status() {
        let err = GithubError::Api {
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "GitHub API error: HTTP 500 Internal Server Error");
    }
}
