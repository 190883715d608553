// src/github/browser.rs
// =============================================================================
// Browsing one repository: which branch is current, and what is on screen.
//
// A directory listing and a file body are never shown at the same time.
// Opening a file replaces the listing; entering a directory drops the file.
// Switching branches goes back to the root of the new branch.
//
// Navigation results that arrive for an old branch/path are the caller's
// problem: every view carries the ref and path it was fetched for, so the
// caller can compare before displaying.
// =============================================================================

use serde::Serialize;

use super::branches::{pick_default, Branch};
use super::client::GithubClient;
use super::contents::{ContentEntry, FileBody};
use super::coordinate::RepoCoordinate;
use crate::error::{GithubError, Result};

#[derive(Debug, Clone)]
pub enum ContentView {
    Directory {
        path: String,
        entries: Vec<ContentEntry>,
    },
    File(FileBody),
}

#[derive(Debug, Clone)]
pub struct RepoBrowser {
    coord: RepoCoordinate,
    branches: Vec<Branch>,
    current: String,
    view: ContentView,
}

/// What a caller needs to tell whether a late result still applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewContext {
    pub repository: String,
    pub r#ref: String,
    pub path: String,
}

impl RepoBrowser {
    /// Loads the branch list, picks the default branch (or `pinned`) and
    /// lists the repository root.
    pub async fn open(
        client: &GithubClient,
        coord: RepoCoordinate,
        pinned: Option<&str>,
    ) -> Result<Self> {
        let branches = client.list_branches(&coord).await?;
        let current = match pinned {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => pick_default(&branches, &coord)?.name.clone(),
        };

        let entries = client.list_directory(&coord, "", Some(&current)).await?;

        Ok(Self {
            coord,
            branches,
            current,
            view: ContentView::Directory {
                path: String::new(),
                entries,
            },
        })
    }

    pub fn coordinate(&self) -> &RepoCoordinate {
        &self.coord
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn current_ref(&self) -> &str {
        &self.current
    }

    pub fn view(&self) -> &ContentView {
        &self.view
    }

    pub fn context(&self) -> ViewContext {
        let path = match &self.view {
            ContentView::Directory { path, .. } => path.clone(),
            ContentView::File(body) => body.path.clone(),
        };
        ViewContext {
            repository: self.coord.to_string(),
            r#ref: self.current.clone(),
            path,
        }
    }

    /// Lists `path` on the current branch. A path that turns out to be a
    /// single file still yields a one-entry directory view.
    pub async fn enter(&mut self, client: &GithubClient, path: &str) -> Result<&ContentView> {
        let entries = client
            .list_directory(&self.coord, path, Some(&self.current))
            .await?;
        self.view = ContentView::Directory {
            path: path.trim_matches('/').to_string(),
            entries,
        };
        Ok(&self.view)
    }

    pub async fn select_file(&mut self, client: &GithubClient, path: &str) -> Result<&ContentView> {
        let body = client.get_file(&self.coord, path, Some(&self.current)).await?;
        self.view = ContentView::File(body);
        Ok(&self.view)
    }

    /// Only branches from the loaded list are accepted.
    pub async fn switch_branch(&mut self, client: &GithubClient, name: &str) -> Result<&ContentView> {
        if !self.branches.iter().any(|b| b.name == name) {
            return Err(GithubError::NotFound(format!("branch {} in {}", name, self.coord)));
        }
        let entries = client.list_directory(&self.coord, "", Some(name)).await?;
        self.current = name.to_string();
        self.view = ContentView::Directory {
            path: String::new(),
            entries,
        };
        Ok(&self.view)
    }
}
