use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::export::OutputFormat;
use crate::models::SearchParams;

/// Search BOOTH and print the listings on one results page as JSON.
/// Exit codes: 0=success, 2=invalid arguments, 3=I/O error, 4=network error, 5=URL build error
#[derive(Parser, Debug)]
#[command(name = "booth-search")]
#[command(about = "Extract product listings from a BOOTH search results page")]
#[command(version)]
pub struct Cli {
    #[arg(
        short,
        long,
        default_value = Config::DEFAULT_QUERY,
        help = "Search keywords (e.g. 'vrchat 衣装' or 'vrchat 衣服')"
    )]
    pub query: String,

    #[arg(
        short,
        long,
        default_value = Config::DEFAULT_SORT,
        value_parser = ["popular", "new"],
        help = "Sort order"
    )]
    pub sort: String,

    #[arg(
        short,
        long,
        default_value_t = 1,
        allow_negative_numbers = true,
        help = "Page number (values below 1 are treated as 1)"
    )]
    pub page: i64,

    #[arg(
        short,
        long,
        default_value = Config::DEFAULT_LANGUAGE,
        value_parser = ["ja", "zh-tw"],
        help = "Site language"
    )]
    pub lang: String,

    #[arg(
        short,
        long,
        default_value_t = Config::REQUEST_TIMEOUT_SECS,
        help = "Request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        short,
        long,
        default_value = Config::USER_AGENT,
        help = "User agent string for requests"
    )]
    pub user_agent: String,

    #[arg(
        short,
        long,
        help = "Extract from a saved HTML file instead of fetching the search page"
    )]
    pub input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, help = "Also write JSON logs with daily rotation to this directory")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments so the rest of the program can rely on structured options.
    /// On error, clap prints help and exits with code 2 (usage error).
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Search parameters for the URL builder
    pub fn search_params(&self) -> SearchParams {
        SearchParams::new(&self.lang, &self.query, &self.sort, self.page)
    }
}
