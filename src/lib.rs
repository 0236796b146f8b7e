pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod network;
pub mod parser;
pub mod url_utils;

// Re-export main types for library usage
pub use export::{export_to_jsonl, write_json, write_listings, OutputFormat};
pub use models::{Listing, SearchParams};
pub use network::{FetchError, FetchResult, HttpClient};
pub use parser::{extract_listings, extract_listings_from_html};
pub use url_utils::{build_search_url, SearchUrlError};
