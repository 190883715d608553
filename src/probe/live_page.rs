// src/probe/live_page.rs
// Does the repository look like it has a page worth opening in a browser?
// index.html at the root is the strong signal; any other root-level .html
// file is good enough.

use crate::github::ContentEntry;

/// The root entry that makes this a live-page candidate, index.html first.
pub fn live_page_entry(root: &[ContentEntry]) -> Option<&ContentEntry> {
    root.iter()
        .find(|e| e.name == "index.html")
        .or_else(|| root.iter().find(|e| e.name.to_ascii_lowercase().ends_with(".html")))
}

pub fn has_live_page(root: &[ContentEntry]) -> bool {
    live_page_entry(root).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::EntryKind;

    fn entries(names: &[&str]) -> Vec<ContentEntry> {
        names
            .iter()
            .map(|n| ContentEntry {
                name: n.to_string(),
                path: n.to_string(),
                kind: EntryKind::File,
                size: 1,
                download_url: None,
            })
            .collect()
    }

    #[test]
    fn test_index_html_preferred() {
        let root = entries(&["about.html", "index.html"]);
        assert_eq!(live_page_entry(&root).unwrap().name, "index.html");
    }

    #[test]
    fn test_any_html_case_insensitive() {
        assert!(has_live_page(&entries(&["README.md", "Demo.HTML"])));
        assert!(!has_live_page(&entries(&["README.md", "index.htm.bak"])));
        assert!(!has_live_page(&[]));
    }
}
