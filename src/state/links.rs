// src/state/links.rs
// =============================================================================
// Link preferences: the user's custom links, plus per-page display order and
// hidden links.
//
// Pages are identified by URL (a profile page, a repository page, ...). A
// page's links are identified by their own URL, so the stored order survives
// links being added or removed upstream.
//
// Reordering is what drag-and-drop boils down to once it is persisted:
// "take the link at index `from` of what is currently shown and drop it at
// index `to`".
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{StateError, StateStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub label: String,
    pub url: String,
}

impl StateStore {
    pub fn custom_links(&self) -> Vec<CustomLink> {
        self.read(|state| state.custom_links.clone())
    }

    /// Adds a link at the end, or replaces the label of an existing link with
    /// the same url (keeping its position).
    pub fn add_custom_link(&self, link: CustomLink) -> Result<(), StateError> {
        if link.url.trim().is_empty() {
            return Err(StateError::InvalidLink("link url is empty".to_string()));
        }

        self.update(|state| {
            match state.custom_links.iter_mut().find(|l| l.url == link.url) {
                Some(existing) => existing.label = link.label,
                None => state.custom_links.push(link),
            }
            Ok(())
        })
    }

    /// Returns whether a link was removed.
    pub fn remove_custom_link(&self, url: &str) -> Result<bool, StateError> {
        self.update(|state| {
            let before = state.custom_links.len();
            state.custom_links.retain(|l| l.url != url);
            Ok(state.custom_links.len() != before)
        })
    }

    /// Moves the link at `from` to `to` within `shown`, the link urls as they
    /// are currently displayed on `page`, and stores the resulting order.
    pub fn move_link(
        &self,
        page: &str,
        shown: &[String],
        from: usize,
        to: usize,
    ) -> Result<Vec<String>, StateError> {
        if from >= shown.len() || to >= shown.len() {
            return Err(StateError::InvalidLink(format!(
                "cannot move link {} to {} in a list of {}",
                from,
                to,
                shown.len()
            )));
        }

        let mut order = shown.to_vec();
        let moved = order.remove(from);
        order.insert(to, moved);

        self.update(|state| {
            state.link_order.insert(page.to_string(), order.clone());
            Ok(order)
        })
    }

    pub fn hide_link(&self, page: &str, url: &str) -> Result<(), StateError> {
        self.update(|state| {
            let hidden = state.hidden_links.entry(page.to_string()).or_default();
            if !hidden.iter().any(|h| h == url) {
                hidden.push(url.to_string());
            }
            Ok(())
        })
    }

    /// Returns whether the link was hidden before.
    pub fn unhide_link(&self, page: &str, url: &str) -> Result<bool, StateError> {
        self.update(|state| {
            let Some(hidden) = state.hidden_links.get_mut(page) else {
                return Ok(false);
            };
            let before = hidden.len();
            hidden.retain(|h| h != url);
            let removed = hidden.len() != before;
            if hidden.is_empty() {
                state.hidden_links.remove(page);
            }
            Ok(removed)
        })
    }

    /// Applies the stored order and hidden set for `page` to `items`.
    pub fn arrange<T>(&self, page: &str, items: Vec<T>, url_of: impl Fn(&T) -> &str) -> Vec<T> {
        self.read(|state| {
            let order = state.link_order.get(page).map(Vec::as_slice).unwrap_or(&[]);
            let hidden = state.hidden_links.get(page).map(Vec::as_slice).unwrap_or(&[]);
            arrange_links(order, hidden, items, url_of)
        })
    }
}

/// Items named in `order` come first, in that order; the rest keep their
/// relative order after them. Anything in `hidden` is dropped.
fn arrange_links<T>(
    order: &[String],
    hidden: &[String],
    items: Vec<T>,
    url_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    let rank = |item: &T| {
        order
            .iter()
            .position(|u| u == url_of(item))
            .unwrap_or(order.len())
    };

    let mut visible: Vec<T> = items
        .into_iter()
        .filter(|item| !hidden.iter().any(|h| h == url_of(item)))
        .collect();

    // sort_by_key is stable, so unranked items keep their input order
    visible.sort_by_key(|item| rank(item));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_replaces_same_url_in_place() {
        let store = StateStore::in_memory();
        store
            .add_custom_link(CustomLink { label: "Blog".into(), url: "https://a.dev".into() })
            .unwrap();
        store
            .add_custom_link(CustomLink { label: "CV".into(), url: "https://b.dev".into() })
            .unwrap();
        store
            .add_custom_link(CustomLink { label: "Writing".into(), url: "https://a.dev".into() })
            .unwrap();

        let links = store.custom_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Writing");
        assert_eq!(links[1].url, "https://b.dev");
    }

    #[test]
    fn test_empty_url_rejected() {
        let store = StateStore::in_memory();
        let result = store.add_custom_link(CustomLink { label: "x".into(), url: " ".into() });
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_reports_whether_anything_changed() {
        let store = StateStore::in_memory();
        store
            .add_custom_link(CustomLink { label: "Blog".into(), url: "https://a.dev".into() })
            .unwrap();
        assert!(store.remove_custom_link("https://a.dev").unwrap());
        assert!(!store.remove_custom_link("https://a.dev").unwrap());
    }

    #[test]
    fn test_move_then_arrange() {
        let store = StateStore::in_memory();
        let shown = urls(&["a", "b", "c"]);

        let order = store.move_link("page", &shown, 2, 0).unwrap();
        assert_eq!(order, urls(&["c", "a", "b"]));

        // "d" is new since the order was stored, it goes last
        let arranged = store.arrange("page", urls(&["a", "d", "b", "c"]), |s| s.as_str());
        assert_eq!(arranged, urls(&["c", "a", "b", "d"]));
    }

    #[test]
    fn test_move_out_of_range() {
        let store = StateStore::in_memory();
        let shown = urls(&["a", "b"]);
        assert!(store.move_link("page", &shown, 0, 2).is_err());
        assert!(store.move_link("page", &shown, 5, 0).is_err());
    }

    #[test]
    fn test_hidden_links_are_dropped_per_page() {
        let store = StateStore::in_memory();
        store.hide_link("p1", "b").unwrap();
        store.hide_link("p1", "b").unwrap();

        assert_eq!(store.arrange("p1", urls(&["a", "b"]), |s| s.as_str()), urls(&["a"]));
        assert_eq!(store.arrange("p2", urls(&["a", "b"]), |s| s.as_str()), urls(&["a", "b"]));

        assert!(store.unhide_link("p1", "b").unwrap());
        assert!(!store.unhide_link("p1", "b").unwrap());
        assert!(store.snapshot().hidden_links.is_empty());
    }
}
