//! Content and link extraction from parsed markup
//!
//! All lookups are first-match in document order: if multiple elements share
//! a class, the first one wins. This is deliberate and relied upon by the
//! traversal engine; do not generalize to collect-all-matches.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// How a selector value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Match on the element id attribute
    Id,
    /// Match on a class token
    Class,
}

/// Extracts the outer HTML of the first element matching the selector.
///
/// Returns `None` when nothing matches. The caller decides whether that is
/// fatal (content region) or a normal end-of-series signal (next link).
pub fn extract_first(html: &str, kind: SelectorKind, value: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = build_selector(kind, value)?;
    document.select(&selector).next().map(|element| element.html())
}

/// Collects every hyperlink target inside the container element with the
/// given id, in document order, resolved against `base`.
///
/// Duplicates are removed while preserving first-seen order, and links
/// leaving the start page's host are skipped. Returns `None` when the
/// container itself is missing.
pub fn collect_links(html: &str, container_id: &str, base: &Url) -> Option<Vec<Url>> {
    let document = Html::parse_document(html);
    let container_selector = build_selector(SelectorKind::Id, container_id)?;
    let container = document.select(&container_selector).next()?;

    let anchor = Selector::parse("a[href]").ok()?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in container.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_link(href, base) else {
            tracing::debug!("Ignoring invalid link '{}'", href);
            continue;
        };
        if !same_host(&resolved, base) {
            tracing::debug!("Skipping external link {}", resolved);
            continue;
        }
        if seen.insert(resolved.clone()) {
            tracing::debug!("Found link to {}", resolved);
            links.push(resolved);
        }
    }

    Some(links)
}

/// Locates the next-page link by class and resolves its target.
///
/// The next element may be the anchor itself or a wrapper around one; in
/// the wrapper case the first `a[href]` descendant is used. Returns `None`
/// when the element is absent or its target is not a usable link, which is
/// the normal end-of-series signal in next-link mode.
pub fn find_next_url(html: &str, next_class: &str, base: &Url) -> Option<Url> {
    let document = Html::parse_document(html);
    let selector = build_selector(SelectorKind::Class, next_class)?;
    let element = document.select(&selector).next()?;

    let href = match element.value().attr("href") {
        Some(href) => Some(href),
        None => {
            let anchor = Selector::parse("a[href]").ok()?;
            element
                .select(&anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
        }
    }?;

    resolve_link(href, base)
}

/// Builds an attribute selector for an id or class token.
///
/// Attribute-token form is used instead of `#id`/`.class` so values that are
/// not valid CSS identifiers (leading digits and the like) still match.
fn build_selector(kind: SelectorKind, value: &str) -> Option<Selector> {
    let css = match kind {
        SelectorKind::Id => format!("[id=\"{value}\"]"),
        SelectorKind::Class => format!("[class~=\"{value}\"]"),
    };
    Selector::parse(&css).ok()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - invalid URLs or non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(absolute) => {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                Some(absolute)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

fn same_host(url: &Url, base: &Url) -> bool {
    url.host_str() == base.host_str()
        && url.port_or_known_default() == base.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/book/page").unwrap()
    }

    #[test]
    fn test_extract_first_by_class() {
        let html = r#"<html><body><div class="content">Hello</div></body></html>"#;
        let fragment = extract_first(html, SelectorKind::Class, "content").unwrap();
        assert!(fragment.contains("Hello"));
        assert!(fragment.starts_with("<div"));
    }

    #[test]
    fn test_extract_first_by_id() {
        let html = r#"<html><body><nav id="toc"><a href="/a">A</a></nav></body></html>"#;
        let fragment = extract_first(html, SelectorKind::Id, "toc").unwrap();
        assert!(fragment.contains("href=\"/a\""));
    }

    #[test]
    fn test_extract_first_takes_first_match_in_document_order() {
        let html = r#"<html><body>
            <div class="content">first</div>
            <div class="content">second</div>
        </body></html>"#;
        let fragment = extract_first(html, SelectorKind::Class, "content").unwrap();
        assert!(fragment.contains("first"));
        assert!(!fragment.contains("second"));
    }

    #[test]
    fn test_extract_first_matches_class_token() {
        let html = r#"<html><body><div class="post content wide">body</div></body></html>"#;
        assert!(extract_first(html, SelectorKind::Class, "content").is_some());
    }

    #[test]
    fn test_extract_first_none_when_absent() {
        let html = r#"<html><body><div class="other">x</div></body></html>"#;
        assert!(extract_first(html, SelectorKind::Class, "content").is_none());
    }

    #[test]
    fn test_collect_links_order_and_resolution() {
        let html = r#"<html><body><div id="toc">
            <a href="/ch1">One</a>
            <a href="ch2">Two</a>
            <a href="https://example.com/ch3">Three</a>
        </div></body></html>"#;
        let links = collect_links(html, "toc", &base_url()).unwrap();
        assert_eq!(
            links.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec![
                "https://example.com/ch1",
                "https://example.com/book/ch2",
                "https://example.com/ch3",
            ]
        );
    }

    #[test]
    fn test_collect_links_deduplicates_preserving_order() {
        let html = r#"<html><body><div id="toc">
            <a href="/ch1">One</a>
            <a href="/ch2">Two</a>
            <a href="/ch1">One again</a>
        </div></body></html>"#;
        let links = collect_links(html, "toc", &base_url()).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].as_str(), "https://example.com/ch1");
        assert_eq!(links[1].as_str(), "https://example.com/ch2");
    }

    #[test]
    fn test_collect_links_skips_invalid_and_external() {
        let html = r##"<html><body><div id="toc">
            <a href="#section">Anchor</a>
            <a href="mailto:a@b.com">Mail</a>
            <a href="javascript:void(0)">Js</a>
            <a href="https://other.com/ch">External</a>
            <a href="/ch1">Real</a>
        </div></body></html>"##;
        let links = collect_links(html, "toc", &base_url()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/ch1");
    }

    #[test]
    fn test_collect_links_ignores_anchors_outside_container() {
        let html = r#"<html><body>
            <a href="/outside">Outside</a>
            <div id="toc"><a href="/inside">Inside</a></div>
        </body></html>"#;
        let links = collect_links(html, "toc", &base_url()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/inside");
    }

    #[test]
    fn test_collect_links_none_when_container_missing() {
        let html = r#"<html><body><div id="other"></div></body></html>"#;
        assert!(collect_links(html, "toc", &base_url()).is_none());
    }

    #[test]
    fn test_find_next_url_on_anchor() {
        let html = r#"<html><body><a class="next" href="page2.html">Next</a></body></html>"#;
        let next = find_next_url(html, "next", &base_url()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/book/page2.html");
    }

    #[test]
    fn test_find_next_url_on_wrapper() {
        let html = r#"<html><body>
            <div class="pager"><a href="/book/page2">Next</a></div>
        </body></html>"#;
        let next = find_next_url(html, "pager", &base_url()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/book/page2");
    }

    #[test]
    fn test_find_next_url_absent() {
        let html = r#"<html><body><div class="content">last page</div></body></html>"#;
        assert!(find_next_url(html, "next", &base_url()).is_none());
    }

    #[test]
    fn test_find_next_url_unusable_target_is_absent() {
        let html = r#"<html><body><a class="next" href="mailto:a@b.com">Next</a></body></html>"#;
        assert!(find_next_url(html, "next", &base_url()).is_none());
    }
}
