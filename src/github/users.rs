// src/github/users.rs
// =============================================================================
// The portfolio's front page: a user's profile and their repositories.
//
//   GET /users/{username}
//   GET /users/{username}/repos?per_page=100&sort=updated
//
// Only the first page of repositories is fetched (100 is GitHub's maximum
// page size).
// =============================================================================

use serde::{Deserialize, Serialize};

use super::client::GithubClient;
use super::coordinate::RepoCoordinate;
use crate::error::Result;

pub const REPOS_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub full_name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    /// Set in the repository settings; often empty
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

impl RepoSummary {
    pub fn coordinate(&self) -> RepoCoordinate {
        RepoCoordinate::new(self.owner.login.clone(), self.name.clone())
    }
}

impl GithubClient {
    pub async fn user_profile(&self, username: &str) -> Result<Profile> {
        self.get_json(self.api_url(["users", username])).await
    }

    pub async fn user_repositories(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let mut url = self.api_url(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &REPOS_PER_PAGE.to_string())
            .append_pair("sort", "updated");
        self.get_json(url).await
    }
}
