use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::url_utils::{build_search_url, SearchUrlError};

/// A single product listing recovered from a search results page.
///
/// Optional fields use the empty string for "not found" and are left out of
/// serialized output. Field order here is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Listing {
    /// Human-readable name, never empty once extracted
    pub title: String,

    /// Canonical absolute URL of the item page, unique within one extraction
    pub url: String,

    /// Image URL as found in the markup (may be relative)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,

    /// Seller's storefront display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shop: String,

    /// Raw price text, not parsed
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price: String,
}

/// Inputs to a single search page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub language: String,
    pub query: String,
    pub sort: String,
    pub page: i64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            language: Config::DEFAULT_LANGUAGE.to_string(),
            query: Config::DEFAULT_QUERY.to_string(),
            sort: Config::DEFAULT_SORT.to_string(),
            page: 1,
        }
    }
}

impl SearchParams {
    pub fn new(
        language: impl Into<String>,
        query: impl Into<String>,
        sort: impl Into<String>,
        page: i64,
    ) -> Self {
        Self {
            language: language.into(),
            query: query.into(),
            sort: sort.into(),
            page,
        }
    }

    /// Build the search results URL for these parameters
    pub fn to_url(&self) -> Result<String, SearchUrlError> {
        build_search_url(&self.language, &self.query, &self.sort, self.page)
    }
}
