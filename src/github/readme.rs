// src/github/readme.rs
// =============================================================================
// README retrieval:  GET /repos/{owner}/{repo}/readme?ref={ref}
//
// GitHub can answer in two ways depending on the Accept header:
// - application/vnd.github.v3.html: HTML it rendered itself
// - application/vnd.github.v3+json: the usual file envelope (base64 markdown)
//
// Either way the result goes through the render pipeline before it is handed
// back, so the caller only ever sees display-ready HTML.
// =============================================================================

use serde::Serialize;

use super::client::{Accept, GithubClient};
use super::coordinate::RepoCoordinate;
use crate::error::Result;
use crate::render::{self, BodyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadmeFormat {
    /// Let GitHub render it
    #[default]
    Html,
    /// Fetch the markdown and render it locally
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readme {
    pub repository: String,
    pub r#ref: String,
    /// Rewritten markdown source, only for ReadmeFormat::Markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    pub html: String,
}

impl GithubClient {
    pub async fn readme(
        &self,
        coord: &RepoCoordinate,
        pinned: Option<&str>,
        format: ReadmeFormat,
    ) -> Result<Readme> {
        let r#ref = self.resolve_ref(coord, pinned).await?;

        let mut url = self.api_url(["repos", coord.owner.as_str(), coord.repo.as_str(), "readme"]);
        url.query_pairs_mut().append_pair("ref", &r#ref);

        let (markdown, html) = match format {
            ReadmeFormat::Html => {
                let response = self.request(url, Accept::Html).await?;
                let html = render::normalize(
                    &response.text(),
                    BodyKind::Html,
                    self.raw_root(),
                    coord,
                    &r#ref,
                );
                (None, html)
            }
            ReadmeFormat::Markdown => {
                let body = self.fetch_file_body(url, "README").await?;
                let markdown =
                    render::rewrite_relative_images(&body.text(), self.raw_root(), coord, &r#ref);
                let html = render::normalize_html(&render::render_markdown(&markdown));
                (Some(markdown), html)
            }
        };

        Ok(Readme {
            repository: coord.to_string(),
            r#ref,
            markdown,
            html,
        })
    }
}
