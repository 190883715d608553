// src/lib.rs
// =============================================================================
// gh-folio: fetch a GitHub user's profile, repositories, branches, files and
// READMEs, and turn them into something ready to display.
//
// Modules:
// - github: API client, credentials, contents, branches, README, users
// - probe:  best-effort repository enrichments (language, live page, demo link)
// - render: markdown/HTML normalization for README bodies
// - state:  persisted client state (token, theme, link preferences)
// - config: runtime configuration and client wiring
// - error:  the library's error types
// =============================================================================

pub mod config;
pub mod error;
pub mod github;
pub mod probe;
pub mod render;
pub mod state;

pub use config::Config;
pub use error::{GithubError, Result};
