//! URL utilities: search URL construction and link normalization.

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use url::form_urlencoded;
use url::Url;

use crate::config::Config;

lazy_static! {
    /// `/items/<digits>` ending the path, or followed by a query or fragment.
    /// Category and shop-root links that merely mention "items" do not match.
    static ref ITEM_LINK_PATTERN: Regex = Regex::new(r"/items/\d+($|[?#])").unwrap();
}

/// Bytes escaped in a single path segment: everything except the RFC 3986
/// unreserved characters and the sub-delims that are legal inside a segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Errors that can occur while building a search URL
#[derive(Debug, thiserror::Error)]
pub enum SearchUrlError {
    #[error("Built search URL does not parse: {0}")]
    Malformed(#[from] url::ParseError),
}

/// Build the search results URL for one page.
///
/// Empty `language` falls back to `ja`, empty `sort` to `popular`, and any
/// `page` below 1 is clamped to 1. The query is escaped as a path segment
/// (space becomes `%20`, never `+`). `order` is always `desc`.
///
/// # Examples
/// ```
/// use booth_search::url_utils::build_search_url;
///
/// let url = build_search_url("ja", "vrchat 衣装", "popular", 1).unwrap();
/// assert_eq!(
///     url,
///     "https://booth.pm/ja/search/vrchat%20%E8%A1%A3%E8%A3%85?sort=popular&order=desc&page=1"
/// );
/// ```
pub fn build_search_url(
    language: &str,
    query: &str,
    sort: &str,
    page: i64,
) -> Result<String, SearchUrlError> {
    let language = if language.is_empty() {
        Config::DEFAULT_LANGUAGE
    } else {
        language
    };
    let sort = if sort.is_empty() {
        Config::DEFAULT_SORT
    } else {
        sort
    };
    let page = page.max(1);

    let query_string = form_urlencoded::Serializer::new(String::new())
        .append_pair("sort", sort)
        .append_pair("order", Config::FORCED_ORDER)
        .append_pair("page", &page.to_string())
        .finish();

    // Assembled by hand: Url's own segment handling collapses "." and ".."
    let raw = format!(
        "https://{}/{}/search/{}?{}",
        Config::MARKETPLACE_HOST,
        escape_path_segment(language),
        escape_path_segment(query),
        query_string
    );
    Url::parse(&raw)?;

    Ok(raw)
}

/// Percent-encode text for use as one URL path segment.
///
/// Space becomes `%20`. A segment made only of dots is fully escaped, since
/// RFC 3986 treats a literal `.` or `..` segment as a relative path step.
pub fn escape_path_segment(segment: &str) -> String {
    if !segment.is_empty() && segment.bytes().all(|b| b == b'.') {
        return "%2E".repeat(segment.len());
    }
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// True when `href` points at a single item detail page
pub fn is_item_link(href: &str) -> bool {
    ITEM_LINK_PATTERN.is_match(href)
}

/// Resolve an href against the marketplace root.
///
/// Missing scheme becomes `https`, missing host becomes `booth.pm`, and a
/// relative path is anchored at `/` rather than joined onto a base path.
pub fn resolve_absolute(href: &str) -> Option<Url> {
    let href = href.trim();

    if href.starts_with("//") {
        return Url::parse(&format!("https:{}", href)).ok();
    }

    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(Config::MARKETPLACE_ROOT).ok()?;
            if href.starts_with('/') {
                base.join(href).ok()
            } else {
                base.join(&format!("/{}", href)).ok()
            }
        }
        Err(_) => None,
    }
}

/// Canonical string form of an item link, used as the dedup key.
/// Falls back to the trimmed href when it cannot be parsed at all.
pub fn canonical_item_url(href: &str) -> String {
    resolve_absolute(href)
        .map(String::from)
        .unwrap_or_else(|| href.trim().to_string())
}

/// True when `href` targets a seller storefront such as `https://micare.booth.pm/`
pub fn is_shop_link(href: &str) -> bool {
    let Some(url) = resolve_absolute(href) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };

    match host.strip_suffix(Config::SHOP_HOST_SUFFIX) {
        Some(subdomain) => !subdomain.is_empty() && subdomain != "www",
        None => false,
    }
}

/// Last non-empty path segment of a URL, ignoring query and fragment
pub fn last_path_segment(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
            .map(|segment| segment.to_string());
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}
