//! Listing extraction from BOOTH search result pages.
//!
//! The markup is not under our control, so nothing here relies on class
//! names. Item-detail anchors are found by their `href`, each anchor's card
//! is approximated by walking up to a container element, and the remaining
//! fields are recovered by independent scans of that card. Every field
//! degrades to the empty string on its own; nothing aborts the page.

use std::collections::HashSet;

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use crate::config::Config;
use crate::models::Listing;
use crate::url_utils::{canonical_item_url, is_item_link, is_shop_link, last_path_segment};

lazy_static! {
    static ref LINK_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
    static ref IMAGE_SELECTOR: Selector = Selector::parse("img").unwrap();
    static ref ALT_IMAGE_SELECTOR: Selector = Selector::parse("img[alt]").unwrap();
    static ref PRICE_SELECTOR: Selector = Selector::parse("span, div, p").unwrap();
}

/// Elements treated as a listing card when walking up from an item link
const CARD_TAGS: &[&str] = &["li", "article", "div"];

/// Lazy-load attribute first; `src` is often a placeholder when it is set
const IMAGE_SOURCE_ATTRS: &[&str] = &["data-src", "src"];

const CURRENCY_SYMBOL: &str = "¥";
const CURRENCY_CODE: &str = "JPY";

type ScopeStrategy = for<'a> fn(&'a Html, ElementRef<'a>) -> Option<ElementRef<'a>>;

/// Tried in order; the first strategy that yields an element is the card scope
const SCOPE_STRATEGIES: &[(&str, ScopeStrategy)] = &[
    ("card", nearest_card_container),
    ("parent", immediate_parent),
    ("document", whole_document),
];

/// Extract every item listing from a parsed search results page.
///
/// Output is in document order of each item's first link, with one record
/// per canonical URL. Later links to an already seen URL are skipped without
/// merging their fields.
///
/// # Examples
/// ```
/// use booth_search::parser::extract_listings;
/// use scraper::Html;
///
/// let html = r#"<ul><li><a href="/ja/items/1">Hoodie</a><span>¥ 500</span></li></ul>"#;
/// let listings = extract_listings(&Html::parse_document(html));
/// assert_eq!(listings.len(), 1);
/// assert_eq!(listings[0].url, "https://booth.pm/ja/items/1");
/// assert_eq!(listings[0].price, "¥ 500");
/// ```
pub fn extract_listings(document: &Html) -> Vec<Listing> {
    let mut listings = Vec::with_capacity(Config::LISTINGS_PER_PAGE);
    let mut seen: HashSet<String> = HashSet::new();

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !is_item_link(href) {
            continue;
        }

        let url = canonical_item_url(href);
        if !seen.insert(url.clone()) {
            debug!(url = %url, "Skipping duplicate item link");
            continue;
        }

        let scope = card_scope(document, link);
        listings.push(Listing {
            title: infer_title(link, scope, &url),
            url,
            image: find_image(scope),
            shop: find_shop(scope),
            price: find_price(scope),
        });
    }

    debug!(count = listings.len(), "Extracted listings");
    listings
}

/// Parse raw markup and extract listings from it
pub fn extract_listings_from_html(html_body: &str) -> Vec<Listing> {
    let document = Html::parse_document(html_body);
    extract_listings(&document)
}

/// Pick the element whose descendants are searched for a link's fields
pub fn card_scope<'a>(document: &'a Html, link: ElementRef<'a>) -> ElementRef<'a> {
    SCOPE_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let scope = strategy(document, link)?;
            trace!(strategy = *name, tag = scope.value().name(), "Resolved card scope");
            Some(scope)
        })
        .unwrap_or_else(|| document.root_element())
}

/// Closest `li`, `article` or `div` ancestor
pub fn nearest_card_container<'a>(_document: &'a Html, link: ElementRef<'a>) -> Option<ElementRef<'a>> {
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| CARD_TAGS.contains(&ancestor.value().name()))
}

pub fn immediate_parent<'a>(_document: &'a Html, link: ElementRef<'a>) -> Option<ElementRef<'a>> {
    link.parent().and_then(ElementRef::wrap)
}

/// Over-broad last resort so a link is never dropped for lack of a container
pub fn whole_document<'a>(document: &'a Html, _link: ElementRef<'a>) -> Option<ElementRef<'a>> {
    Some(document.root_element())
}

/// Source of the first image in the scope, preferring the lazy-load attribute
pub fn find_image(scope: ElementRef) -> String {
    let Some(image) = scope.select(&IMAGE_SELECTOR).next() else {
        return String::new();
    };

    IMAGE_SOURCE_ATTRS
        .iter()
        .filter_map(|attr| image.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Text of the first storefront link (`<shop>.booth.pm`) in the scope
pub fn find_shop(scope: ElementRef) -> String {
    scope
        .select(&LINK_SELECTOR)
        .filter(|anchor| {
            anchor
                .value()
                .attr("href")
                .is_some_and(|href| is_shop_link(href) && !is_item_link(href))
        })
        .map(trimmed_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// First `span`, `div` or `p` whose text carries a yen marker
pub fn find_price(scope: ElementRef) -> String {
    scope
        .select(&PRICE_SELECTOR)
        .map(trimmed_text)
        .find(|text| has_currency_marker(text))
        .unwrap_or_default()
}

/// Link text, then the first non-empty image `alt`, then the URL's last path segment
pub fn infer_title(link: ElementRef, scope: ElementRef, url: &str) -> String {
    let text = trimmed_text(link);
    if !text.is_empty() {
        return text;
    }

    let alt = scope
        .select(&ALT_IMAGE_SELECTOR)
        .filter_map(|image| image.value().attr("alt"))
        .map(str::trim)
        .find(|alt| !alt.is_empty());
    if let Some(alt) = alt {
        return alt.to_string();
    }

    last_path_segment(url).unwrap_or_else(|| url.to_string())
}

fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn has_currency_marker(text: &str) -> bool {
    text.contains(CURRENCY_SYMBOL) || text.to_uppercase().contains(CURRENCY_CODE)
}
