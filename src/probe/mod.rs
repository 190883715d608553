// src/probe/mod.rs
// =============================================================================
// Best-effort enrichments for a repository card:
// - language:  dominant language guessed from root file extensions
// - live_page: is there an index.html / any .html at the root?
// - manifest:  a package.json "homepage" on any branch
//
// language and live_page are both read off one root listing, fetched once
// per repository. None of these can fail. Each returns a Probed<T>: the value (or its
// default when something went wrong) plus the soft failures it absorbed on
// the way, so callers and tests can see what was swallowed.
//
// enrich() fetches the root listing and searches the manifests for one
// repository concurrently;
// enrich_all() does that for a list of repositories with a cap on how many
// are in flight.
// =============================================================================

mod language;
mod live_page;
mod manifest;

pub use language::{detect_primary_language, language_for_extension};
pub use live_page::{has_live_page, live_page_entry};
pub use manifest::{manifest_homepage, ManifestHomepage, MANIFEST_PATH};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::error::GithubError;
use crate::github::{ContentEntry, GithubClient, RepoCoordinate};

/// An error a probe absorbed instead of returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftFailure {
    /// What was being looked at, e.g. "package.json@dev"
    pub context: String,
    pub reason: String,
}

impl SoftFailure {
    pub fn new(context: impl Into<String>, error: &GithubError) -> Self {
        Self {
            context: context.into(),
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Probed<T> {
    pub value: T,
    pub soft_failures: Vec<SoftFailure>,
}

impl<T> Probed<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            soft_failures: Vec::new(),
        }
    }

    pub fn degraded(fallback: T, failure: SoftFailure) -> Self {
        debug!("Probe degraded ({}): {}", failure.context, failure.reason);
        Self {
            value: fallback,
            soft_failures: vec![failure],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub repository: String,
    pub language: Option<String>,
    pub has_live_page: bool,
    pub manifest_homepage: Option<ManifestHomepage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub soft_failures: Vec<SoftFailure>,
}

impl GithubClient {
    /// Root listing of the default branch; empty when it can't be fetched.
    pub async fn root_listing(&self, coord: &RepoCoordinate) -> Probed<Vec<ContentEntry>> {
        match self.list_directory(coord, "", None).await {
            Ok(entries) => Probed::clean(entries),
            Err(e) => Probed::degraded(Vec::new(), SoftFailure::new(format!("root@{}", coord), &e)),
        }
    }

    pub async fn enrich(&self, coord: &RepoCoordinate) -> Enrichment {
        let (root, manifest) =
            futures::join!(self.root_listing(coord), self.find_manifest_homepage(coord));

        let mut soft_failures = root.soft_failures;
        soft_failures.extend(manifest.soft_failures);

        Enrichment {
            repository: coord.to_string(),
            language: detect_primary_language(&root.value).map(str::to_string),
            has_live_page: has_live_page(&root.value),
            manifest_homepage: manifest.value,
            soft_failures,
        }
    }

    /// Enriches every repository, at most `concurrency` at a time. Output
    /// order matches input order.
    pub async fn enrich_all(&self, coords: &[RepoCoordinate], concurrency: usize) -> Vec<Enrichment> {
        stream::iter(coords)
            .map(|coord| self.enrich(coord))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
