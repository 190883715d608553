// src/probe/language.rs
// Guess a repository's main language by counting file extensions in one
// directory listing (the root, usually).

use crate::github::{ContentEntry, EntryKind};

// Extension -> display label. Several extensions can share a label; counts
// are tallied per label.
const LANGUAGES: &[(&str, &str)] = &[
    ("py", "Python"),
    ("ipynb", "Jupyter Notebook"),
    ("js", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("jsx", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("rs", "Rust"),
    ("go", "Go"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("scala", "Scala"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("cxx", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("dart", "Dart"),
    ("lua", "Lua"),
    ("r", "R"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("ps1", "PowerShell"),
    ("html", "HTML"),
    ("htm", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("sass", "Sass"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("sql", "SQL"),
    ("hs", "Haskell"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("erl", "Erlang"),
    ("clj", "Clojure"),
    ("ml", "OCaml"),
    ("zig", "Zig"),
    ("sol", "Solidity"),
];

pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, label)| *label)
}

/// The label with the strictly highest count; on a tie the label seen first
/// wins. None when no file has a known extension.
pub fn detect_primary_language(entries: &[ContentEntry]) -> Option<&'static str> {
    // (label, count) in first-seen order
    let mut tally: Vec<(&'static str, usize)> = Vec::new();

    for entry in entries.iter().filter(|e| e.kind == EntryKind::File) {
        let Some((_, ext)) = entry.name.rsplit_once('.') else {
            continue;
        };
        let Some(label) = language_for_extension(&ext.to_ascii_lowercase()) else {
            continue;
        };
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (label, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<ContentEntry> {
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
    fn test_majority_wins() {
        assert_eq!(detect_primary_language(&files(&["a.py", "b.py", "c.js"])), Some("Python"));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(detect_primary_language(&files(&["a.xyz"])), None);
        assert_eq!(detect_primary_language(&[]), None);
        assert_eq!(detect_primary_language(&files(&["Makefile", "LICENSE"])), None);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        assert_eq!(detect_primary_language(&files(&["a.js", "b.rs", "c.rs", "d.js"])), Some("JavaScript"));
    }

    #[test]
    fn test_extensions_share_a_label_and_case_is_ignored() {
        assert_eq!(
            detect_primary_language(&files(&["a.TS", "b.tsx", "c.py", "d.py"])),
            Some("TypeScript")
        );
    }

    #[test]
    fn test_directories_are_ignored() {
        let mut entries = files(&["main.go"]);
        for name in ["a.py", "b.py"] {
            entries.push(ContentEntry {
                name: name.to_string(),
                path: name.to_string(),
                kind: EntryKind::Dir,
                size: 0,
                download_url: None,
            });
        }
        assert_eq!(detect_primary_language(&entries), Some("Go"));
    }
}
