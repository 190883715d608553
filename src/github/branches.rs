// src/github/branches.rs
// =============================================================================
// Branch listing and default-branch selection.
//
// GitHub returns branches in its own order (not guaranteed alphabetical);
// we keep that order. The default pick is "main", then "master", then the
// first branch listed. No branches at all means the repository has no
// commits yet.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::client::GithubClient;
use super::coordinate::RepoCoordinate;
use crate::error::{GithubError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: String,
}

// Wire shape: {"name": "main", "commit": {"sha": "...", "url": "..."}}
#[derive(Deserialize)]
struct BranchPayload {
    name: String,
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

impl From<BranchPayload> for Branch {
    fn from(payload: BranchPayload) -> Self {
        Branch {
            name: payload.name,
            commit: payload.commit.sha,
        }
    }
}

impl GithubClient {
    pub async fn list_branches(&self, coord: &RepoCoordinate) -> Result<Vec<Branch>> {
        let url = self.api_url(["repos", coord.owner.as_str(), coord.repo.as_str(), "branches"]);
        let payload: Vec<BranchPayload> = self.get_json(url).await?;
        Ok(payload.into_iter().map(Branch::from).collect())
    }

    /// The branch to browse when the caller didn't pin one.
    pub async fn default_branch(&self, coord: &RepoCoordinate) -> Result<Branch> {
        let branches = self.list_branches(coord).await?;
        pick_default(&branches, coord).cloned()
    }

    /// `pinned` if given, else the default branch's name.
    pub async fn resolve_ref(&self, coord: &RepoCoordinate, pinned: Option<&str>) -> Result<String> {
        match pinned {
            Some(r) if !r.is_empty() => Ok(r.to_string()),
            _ => Ok(self.default_branch(coord).await?.name),
        }
    }
}

/// "main" wherever it is, else "master", else the first entry. An empty
/// list means `coord` has no commits.
pub fn pick_default<'a>(branches: &'a [Branch], coord: &RepoCoordinate) -> Result<&'a Branch> {
    branches
        .iter()
        .find(|b| b.name == "main")
        .or_else(|| branches.iter().find(|b| b.name == "master"))
        .or_else(|| branches.first())
        .ok_or_else(|| GithubError::EmptyRepository(coord.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::{anonymous_client, FakeTransport, API};
    use std::sync::Arc;

    fn coord() -> RepoCoordinate {
        RepoCoordinate::new("alice", "repo")
    }

    fn branches(names: &[&str]) -> Vec<Branch> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Branch {
                name: n.to_string(),
                commit: format!("sha{}", i),
            })
            .collect()
    }

    #[test]
    fn test_main_wins_regardless_of_position() {
        let list = branches(&["dev", "master", "main"]);
        assert_eq!(pick_default(&list, &coord()).unwrap().name, "main");
    }

    #[test]
    fn test_master_when_no_main() {
        let list = branches(&["feature", "master"]);
        assert_eq!(pick_default(&list, &coord()).unwrap().name, "master");
    }

    #[test]
    fn test_first_when_neither() {
        let list = branches(&["gh-pages", "dev"]);
        assert_eq!(pick_default(&list, &coord()).unwrap().name, "gh-pages");
    }

    #[test]
    fn test_empty_is_empty_repository() {
        let err = pick_default(&[], &coord()).unwrap_err();
        assert!(matches!(err, GithubError::EmptyRepository(ref r) if r == "alice/repo"));
    }

    #[tokio::test]
    async fn test_list_keeps_provider_order() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond(
            &format!("{}/repos/alice/repo/branches", API),
            200,
            r#"[
                {"name": "zeta", "commit": {"sha": "111", "url": "x"}, "protected": false},
                {"name": "alpha", "commit": {"sha": "222", "url": "y"}, "protected": false}
            ]"#,
        );

        let client = anonymous_client(fake);
        let list = client.list_branches(&RepoCoordinate::new("alice", "repo")).await.unwrap();
        assert_eq!(
            list,
            vec![
                Branch { name: "zeta".into(), commit: "111".into() },
                Branch { name: "alpha".into(), commit: "222".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_repository() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond(&format!("{}/repos/alice/empty/branches", API), 200, "[]");

        let client = anonymous_client(fake);
        let err = client
            .default_branch(&RepoCoordinate::new("alice", "empty"))
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::EmptyRepository(ref r) if r == "alice/empty"));
    }

    #[tokio::test]
    async fn test_pinned_ref_skips_branch_lookup() {
        let fake = Arc::new(FakeTransport::new());
        let client = anonymous_client(fake.clone());
        let r = client
            .resolve_ref(&RepoCoordinate::new("alice", "repo"), Some("v1.0"))
            .await
            .unwrap();
        assert_eq!(r, "v1.0");
        assert!(fake.requests().is_empty());
    }
}
