// Global configuration constants - single source of truth

pub struct Config;

impl Config {
    // Marketplace
    pub const MARKETPLACE_HOST: &'static str = "booth.pm";
    pub const MARKETPLACE_ROOT: &'static str = "https://booth.pm/";
    pub const SHOP_HOST_SUFFIX: &'static str = ".booth.pm";

    // Search defaults
    pub const DEFAULT_LANGUAGE: &'static str = "ja";
    pub const DEFAULT_SORT: &'static str = "popular";
    pub const DEFAULT_QUERY: &'static str = "vrchat 衣装";
    pub const FORCED_ORDER: &'static str = "desc";

    // HTTP/Network config
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    pub const ACCEPT_LANGUAGE: &'static str = "ja,en-US;q=0.9,en;q=0.8,zh-TW;q=0.7";
    pub const MAX_CONTENT_SIZE: usize = 10 * 1024 * 1024; // 10MB
    pub const MAX_RETRIES: u32 = 2;
    pub const RETRY_BACKOFF_MS: u64 = 500;
    pub const MAX_REDIRECTS: usize = 5;

    // Typical page size, used to pre-size result buffers
    pub const LISTINGS_PER_PAGE: usize = 60;
}
