//! Fragment cleanup before rendering
//!
//! Two best-effort string transforms applied to every extracted fragment:
//! percentage-sized styling is stripped because the renderer chokes on it,
//! and relative `href`/`src` targets are rewritten to absolute URLs so links
//! and images keep working inside the PDF. Both transforms are pure and
//! never fail; markup they cannot make sense of passes through unchanged.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use url::Url;

static STYLE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static DIMENSION_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+(?:width|height)\s*=\s*(?:"[^"]*%[^"]*"|'[^']*%[^']*'|[^\s>"']*%[^\s>"']*)"#)
        .unwrap()
});

static URL_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(href|src)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Removes percentage-valued sizing from a fragment.
///
/// Inline style declarations with a `%` value are dropped (other
/// declarations in the same attribute are kept), and width/height
/// attributes with percentage values are removed entirely.
pub fn sanitize(fragment: &str) -> String {
    // Nothing to strip, nothing to touch.
    if !fragment.contains('%') {
        return fragment.to_string();
    }

    let styles_cleaned = STYLE_ATTR.replace_all(fragment, |caps: &Captures| {
        if let Some(style) = caps.get(1) {
            match strip_percent_declarations(style.as_str()) {
                Cow::Borrowed(_) => caps[0].to_string(),
                Cow::Owned(stripped) => format!("style=\"{stripped}\""),
            }
        } else if let Some(style) = caps.get(2) {
            match strip_percent_declarations(style.as_str()) {
                Cow::Borrowed(_) => caps[0].to_string(),
                Cow::Owned(stripped) => format!("style='{stripped}'"),
            }
        } else {
            caps[0].to_string()
        }
    });

    DIMENSION_ATTR.replace_all(&styles_cleaned, "").into_owned()
}

/// Rewrites relative `href`/`src` attribute values against the page URL.
///
/// Absolute URLs, fragments, and special schemes are left alone.
pub fn absolutize_urls(fragment: &str, base: &Url) -> String {
    URL_ATTR
        .replace_all(fragment, |caps: &Captures| {
            let attr = &caps[1];
            let (value, quote) = match (caps.get(2), caps.get(3)) {
                (Some(v), _) => (v.as_str(), '"'),
                (_, Some(v)) => (v.as_str(), '\''),
                _ => return caps[0].to_string(),
            };
            match absolutize(value, base) {
                Some(absolute) => format!("{attr}={quote}{absolute}{quote}"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Drops `property: value` declarations whose value contains a percentage
/// token. Text that does not look like a declaration is not a candidate for
/// stripping, so malformed style attributes come back borrowed and
/// unchanged.
fn strip_percent_declarations(style: &str) -> Cow<'_, str> {
    if !style.contains('%') {
        return Cow::Borrowed(style);
    }

    let declarations: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .collect();

    let kept: Vec<&str> = declarations
        .iter()
        .copied()
        .filter(|declaration| !(declaration.contains(':') && declaration.contains('%')))
        .collect();

    if kept.len() == declarations.len() {
        return Cow::Borrowed(style);
    }

    Cow::Owned(kept.join("; "))
}

fn absolutize(value: &str, base: &Url) -> Option<String> {
    let value = value.trim();

    if value.is_empty()
        || value.starts_with('#')
        || value.starts_with("data:")
        || value.starts_with("mailto:")
        || value.starts_with("javascript:")
    {
        return None;
    }

    // Already absolute.
    if Url::parse(value).is_ok() {
        return None;
    }

    base.join(value).ok().map(|url| url.to_string())
}
