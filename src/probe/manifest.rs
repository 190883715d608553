// src/probe/manifest.rs
// =============================================================================
// Look for a live-demo link in package.json's "homepage" field.
//
// Branches are tried in the order GitHub lists them. The first branch whose
// package.json decodes and carries a non-empty homepage wins. A branch with
// no package.json, or one without a homepage, is skipped quietly; a broken or
// unreachable one is recorded as a soft failure. Either way the search moves
// on. Nothing in here returns an error.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use super::{Probed, SoftFailure};
use crate::error::GithubError;
use crate::github::{GithubClient, RepoCoordinate};

pub const MANIFEST_PATH: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestHomepage {
    pub homepage: String,
    pub branch: String,
}

/// The cleaned-up homepage of a package.json body: trimmed, backticks
/// removed. Ok(None) when there is no usable homepage.
pub fn manifest_homepage(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let manifest: serde_json::Value = serde_json::from_slice(body)?;
    Ok(manifest
        .get("homepage")
        .and_then(|h| h.as_str())
        .map(|h| h.replace('`', "").trim().to_string())
        .filter(|h| !h.is_empty()))
}

impl GithubClient {
    pub async fn find_manifest_homepage(
        &self,
        coord: &RepoCoordinate,
    ) -> Probed<Option<ManifestHomepage>> {
        let mut failures = Vec::new();

        let branches = match self.list_branches(coord).await {
            Ok(branches) => branches,
            Err(e) => {
                return Probed::degraded(None, SoftFailure::new(format!("branches@{}", coord), &e))
            }
        };

        for branch in branches {
            let context = format!("{}@{}", MANIFEST_PATH, branch.name);

            let body = match self.get_file(coord, MANIFEST_PATH, Some(&branch.name)).await {
                Ok(body) => body,
                Err(e) if e.is_not_found() => {
                    debug!("No {} in {}", context, coord);
                    continue;
                }
                Err(e) => {
                    debug!("No usable {} in {}: {}", context, coord, e);
                    failures.push(SoftFailure::new(context, &e));
                    continue;
                }
            };

            match manifest_homepage(&body.bytes) {
                Ok(Some(homepage)) => {
                    return Probed {
                        value: Some(ManifestHomepage {
                            homepage,
                            branch: branch.name,
                        }),
                        soft_failures: failures,
                    };
                }
                Ok(None) => {
                    debug!("{} in {} has no homepage", context, coord);
                }
                Err(e) => {
                    let err = GithubError::Decode(e.to_string());
                    failures.push(SoftFailure::new(context, &err));
                }
            }
        }

        Probed {
            value: None,
            soft_failures: failures,
        }
    }
}
