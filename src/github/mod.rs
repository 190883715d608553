// src/github/mod.rs
// =============================================================================
// Everything that talks to the GitHub REST API.
//
// Submodules:
// - token:      the single optional credential (environment or persisted)
// - client:     HTTP wrapper: headers, status classification, retry-once
// - coordinate: owner/repo parsing and raw-content URLs
// - branches:   branch listing and default-branch pick
// - contents:   directory listings and decoded file bodies
// - browser:    per-repository browsing state (branch + current view)
// - readme:     README fetch + normalization
// - users:      profile and repository list
// =============================================================================

mod branches;
mod browser;
mod client;
mod contents;
mod coordinate;
mod readme;
mod token;
mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use branches::{pick_default, Branch};
pub use browser::{ContentView, RepoBrowser, ViewContext};
pub use client::{
    Accept, ApiRequest, CredentialPrompt, GithubClient, NoPrompt, RawResponse, ReqwestTransport,
    Transport, USER_AGENT,
};
pub use contents::{decode_base64_content, BodyEncoding, ContentEntry, EntryKind, FileBody};
pub use coordinate::RepoCoordinate;
pub use readme::{Readme, ReadmeFormat};
pub use token::{TokenSource, TokenStore};
pub use users::{Profile, RepoOwner, RepoSummary, REPOS_PER_PAGE};
