// src/render/html.rs
// =============================================================================
// Post-processing for README HTML (GitHub-rendered or our own rendering).
//
// - every <a> without target="_blank" gets target="_blank" and
//   rel="noopener noreferrer" (any other target/rel is replaced)
// - every <img> gets the IMAGE_CLASS class
// - every <pre> gets the PRE_CLASS class
//
// This is a tag-level rewrite: only the opening tags are touched, the rest of
// the document passes through byte for byte.
// =============================================================================

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const IMAGE_CLASS: &str = "readme-image";
pub const PRE_CLASS: &str = "readme-pre";

// The patterns are constants; a failure here is a programmer error
static ANCHOR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<a(\s[^>]*)?>").expect("anchor pattern is valid"));
static IMG_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<img(\s[^>]*?)?(\s*/)?>").expect("img pattern is valid"));
static PRE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<pre(\s[^>]*)?>").expect("pre pattern is valid"));
static TARGET_BLANK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)target\s*=\s*(?:"_blank"|'_blank'|_blank(?:[\s/]|$))"#)
        .expect("target pattern is valid")
});
static TARGET_OR_REL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s(?:target|rel)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("target/rel pattern is valid")
});
static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("class pattern is valid")
});

pub fn normalize_html(html: &str) -> String {
    let html = ANCHOR_TAG.replace_all(html, |caps: &Captures| {
        rewrite_anchor(caps.get(1).map_or("", |m| m.as_str()))
    });

    let html = IMG_TAG.replace_all(&html, |caps: &Captures| {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let self_close = caps.get(2).map_or("", |m| m.as_str());
        format!("<img{}{}>", add_class(attrs, IMAGE_CLASS), self_close)
    });

    let html = PRE_TAG.replace_all(&html, |caps: &Captures| {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        format!("<pre{}>", add_class(attrs, PRE_CLASS))
    });

    html.into_owned()
}

fn rewrite_anchor(attrs: &str) -> String {
    if TARGET_BLANK.is_match(attrs) {
        return format!("<a{}>", attrs);
    }
    let attrs = TARGET_OR_REL.replace_all(attrs, "");
    format!(r#"<a{} target="_blank" rel="noopener noreferrer">"#, attrs)
}

fn add_class(attrs: &str, class: &str) -> String {
    let Some(caps) = CLASS_ATTR.captures(attrs) else {
        return format!(r#"{} class="{}""#, attrs, class);
    };

    let existing = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
    if existing.split_whitespace().any(|c| c == class) {
        return attrs.to_string();
    }

    let merged = if existing.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {}", existing.trim(), class)
    };

    // caps[0] is the whole class="..." including its leading whitespace
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    format!(
        r#"{}{}class="{}"{}"#,
        &attrs[..whole.start],
        &caps[1],
        merged,
        &attrs[whole.end..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn attr(html: &str, selector: &str, name: &str) -> Vec<Option<String>> {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .map(|el| el.value().attr(name).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_anchor_gets_blank_target() {
        let out = normalize_html(r#"<p><a href="https://rust-lang.org">Rust</a></p>"#);
        assert_eq!(attr(&out, "a", "target"), vec![Some("_blank".to_string())]);
        assert_eq!(attr(&out, "a", "rel"), vec![Some("noopener noreferrer".to_string())]);
        assert_eq!(attr(&out, "a", "href"), vec![Some("https://rust-lang.org".to_string())]);
    }

    #[test]
    fn test_existing_blank_target_untouched() {
        let html = r#"<a href="x" target="_blank" rel="me">x</a>"#;
        assert_eq!(normalize_html(html), html);
    }

    #[test]
    fn test_blank_prefixed_target_is_not_blank() {
        let out = normalize_html(r#"<a href="x" target="_blanket">x</a>"#);
        assert_eq!(attr(&out, "a", "target"), vec![Some("_blank".to_string())]);
        assert_eq!(out.matches("target=").count(), 1);

        // unquoted and single-quoted _blank still count
        let unquoted = r#"<a href=x target=_blank>x</a>"#;
        assert_eq!(normalize_html(unquoted), unquoted);
        let single = r#"<a href='x' target='_blank'>x</a>"#;
        assert_eq!(normalize_html(single), single);
    }

    #[test]
    fn test_other_target_replaced() {
        let out = normalize_html(r#"<a href="x" target="_self" rel="nofollow">x</a>"#);
        assert_eq!(attr(&out, "a", "target"), vec![Some("_blank".to_string())]);
        assert_eq!(attr(&out, "a", "rel"), vec![Some("noopener noreferrer".to_string())]);
        assert_eq!(out.matches("target=").count(), 1);
    }

    #[test]
    fn test_similar_tags_are_not_anchors() {
        let html = "<abbr>HTML</abbr><article>x</article>";
        assert_eq!(normalize_html(html), html);
    }

    #[test]
    fn test_images_tagged() {
        let out = normalize_html(r#"<img src="a.png"><img src="b.png" class="logo" /><img>"#);
        assert_eq!(
            attr(&out, "img", "class"),
            vec![
                Some(IMAGE_CLASS.to_string()),
                Some(format!("logo {}", IMAGE_CLASS)),
                Some(IMAGE_CLASS.to_string()),
            ]
        );
        assert!(out.contains(r#"class="logo readme-image" />"#));
    }

    #[test]
    fn test_pre_tagged_once() {
        let out = normalize_html(r#"<pre lang="rust"><code>fn x() {}</code></pre>"#);
        assert_eq!(attr(&out, "pre", "class"), vec![Some(PRE_CLASS.to_string())]);
        assert_eq!(attr(&out, "pre", "lang"), vec![Some("rust".to_string())]);

        // running twice doesn't stack classes
        assert_eq!(normalize_html(&out), out);
    }

    #[test]
    fn test_data_class_is_not_class() {
        let out = normalize_html(r#"<pre data-class="x">y</pre>"#);
        assert_eq!(attr(&out, "pre", "class"), vec![Some(PRE_CLASS.to_string())]);
        assert_eq!(attr(&out, "pre", "data-class"), vec![Some("x".to_string())]);
    }
}
