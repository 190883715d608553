// src/render/markdown.rs
// =============================================================================
// Raw markdown handling for README bodies.
//
// Two jobs:
// 1. Point relative images at raw content. `![logo](img/logo.png)` in
//    alice/site on main becomes
//    `![logo](https://raw.githubusercontent.com/alice/site/main/img/logo.png)`.
//    Absolute references (http..., data:, //host/...) are left alone.
// 2. Render markdown to HTML with pulldown-cmark (GitHub-ish extensions on:
//    tables, strikethrough, task lists, footnotes).
//
// The rewrite works on the markdown text itself, so the rewritten markdown
// can be handed back to callers as well as rendered. Code (fenced, indented
// or inline) is left as written.
// =============================================================================

use once_cell::sync::Lazy;
use pulldown_cmark::{html, Event, Options, Parser, Tag};
use regex::{Captures, Regex};
use std::ops::Range;
use url::Url;

use crate::github::RepoCoordinate;

// ![alt](dest "optional title"), dest optionally wrapped in <...>
static IMAGE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(\s*(<[^>]*>|[^)\s]+)((?:\s+"[^"]*")?)\s*\)"#)
        .expect("image reference pattern is valid")
});

pub fn rewrite_relative_images(
    markdown: &str,
    raw_root: &Url,
    coord: &RepoCoordinate,
    r#ref: &str,
) -> String {
    let code = code_ranges(markdown);

    IMAGE_REF
        .replace_all(markdown, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if code.iter().any(|r| r.contains(&start)) {
                return caps[0].to_string();
            }

            let alt = &caps[1];
            let dest = caps[2].trim_start_matches('<').trim_end_matches('>');
            let title = &caps[3];

            if is_absolute(dest) {
                return caps[0].to_string();
            }

            // ?raw=true and #fragments mean nothing on raw content
            let path = dest.split(['?', '#']).next().unwrap_or(dest);
            let url = coord.raw_url(raw_root, r#ref, path);
            format!("![{}]({}{})", alt, url, title)
        })
        .into_owned()
}

fn is_absolute(dest: &str) -> bool {
    dest.starts_with("http") || dest.starts_with("data:") || dest.starts_with("//")
}

// Byte ranges of code blocks and inline code spans
fn code_ranges(markdown: &str) -> Vec<Range<usize>> {
    Parser::new_ext(markdown, options())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
