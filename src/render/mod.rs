// src/render/mod.rs
// =============================================================================
// Turns fetched README/markdown bodies into display-ready HTML.
//
// Submodules:
// - markdown: relative image rewriting + markdown -> HTML
// - html: link targets and presentation classes on the final HTML
// =============================================================================

mod html;
mod markdown;

pub use html::{normalize_html, IMAGE_CLASS, PRE_CLASS};
pub use markdown::{render_markdown, rewrite_relative_images};

use url::Url;

use crate::github::RepoCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Raw markdown source
    Markdown,
    /// HTML already rendered by GitHub
    Html,
}

/// Display-ready HTML for a fetched body. Markdown gets its relative images
/// pointed at raw content for `coord` at `r#ref` and is rendered first.
pub fn normalize(
    body: &str,
    kind: BodyKind,
    raw_root: &Url,
    coord: &RepoCoordinate,
    r#ref: &str,
) -> String {
    match kind {
        BodyKind::Html => normalize_html(body),
        BodyKind::Markdown => {
            let markdown = rewrite_relative_images(body, raw_root, coord, r#ref);
            normalize_html(&render_markdown(&markdown))
        }
    }
}
