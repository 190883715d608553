// src/github/coordinate.rs
// =============================================================================
// RepoCoordinate: the (owner, repository) pair that identifies a repository.
//
// Accepted input forms:
//   owner/repo
//   https://github.com/owner/repo
//   github.com/owner/repo.git
//   https://github.com/owner/repo/tree/main/docs   (extra path is ignored)
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::GithubError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoCoordinate {
    pub owner: String,
    pub repo: String,
}

impl RepoCoordinate {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, GithubError> {
        let trimmed = input
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        // A bare "owner/repo" has no host; anything else must be github.com
        let path = if let Some(rest) = trimmed.strip_prefix("github.com/") {
            rest
        } else if trimmed.split('/').next().is_some_and(|host| host.contains('.')) {
            return Err(GithubError::Decode(format!("Not a GitHub URL: {}", input)));
        } else {
            trimmed
        };

        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let (Some(owner), Some(repo)) = (parts.next(), parts.next()) else {
            return Err(GithubError::Decode(format!(
                "Invalid repository, expected owner/repo: {}",
                input
            )));
        };

        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            return Err(GithubError::Decode(format!(
                "Invalid repository, expected owner/repo: {}",
                input
            )));
        }

        Ok(Self::new(owner, repo))
    }

    /// `{root}/{owner}/{repo}/{ref}/{path}`: where a file's bytes can be
    /// fetched directly (images in READMEs point here).
    pub fn raw_url(&self, root: &Url, r#ref: &str, path: &str) -> Url {
        let mut url = root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([self.owner.as_str(), self.repo.as_str()])
                .extend(r#ref.split('/'))
                .extend(path.split('/').filter(|s| !s.is_empty() && *s != "."));
        }
        url
    }
}

impl FromStr for RepoCoordinate {
    type Err = GithubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
