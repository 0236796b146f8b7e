use std::time::Duration;

use reqwest::StatusCode;
use scraper::Html;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::Config;

/// HTTP client for fetching search result pages
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout_duration: Duration,
    user_agent: String,
    max_content_size: usize,
}

impl HttpClient {
    /// Create a new HTTP client with the default content size limit
    pub fn new(user_agent: String, timeout_secs: u64) -> Result<Self, FetchError> {
        Self::with_content_limit(user_agent, timeout_secs, Config::MAX_CONTENT_SIZE)
    }

    /// Create a new HTTP client with custom content size limit
    pub fn with_content_limit(
        user_agent: String,
        timeout_secs: u64,
        max_content_size: usize,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(Config::CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(Config::MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            timeout_duration: Duration::from_secs(timeout_secs),
            user_agent,
            max_content_size,
        })
    }

    /// Get the user agent string used by this client
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetch a URL and parse the body as an HTML document
    pub async fn fetch_document(&self, url: &str) -> Result<Html, FetchError> {
        let result = self.fetch(url).await?;
        Ok(Html::parse_document(&result.content))
    }

    /// Fetch a URL and return the response body as a string
    /// Retries transient errors with a linear backoff
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let mut last_error = None;

        for attempt in 0..=Config::MAX_RETRIES {
            // 0ms, 500ms, 1000ms
            if attempt > 0 {
                let backoff_ms = Config::RETRY_BACKOFF_MS * attempt as u64;
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }

            match self.fetch_once(url).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if e.is_retryable() && attempt < Config::MAX_RETRIES {
                        warn!(url = %url, attempt = attempt + 1, error = %e, "Retrying fetch");
                        last_error = Some(e);
                        continue;
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::NetworkError("Max retries exceeded".to_string())))
    }

    /// Fetch a URL once (internal helper for retry logic)
    async fn fetch_once(&self, url: &str) -> Result<FetchResult, FetchError> {
        debug!(url = %url, "Fetching");

        let response = timeout(
            self.timeout_duration,
            self.client
                .get(url)
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header("Accept-Language", Config::ACCEPT_LANGUAGE)
                .send(),
        )
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(Self::classify_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        if let Some(length) = response.content_length() {
            let length = length as usize;
            if length > self.max_content_size {
                return Err(FetchError::ContentTooLarge(length, self.max_content_size));
            }
        }

        let content = timeout(self.timeout_duration, response.text())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| FetchError::BodyError(e.to_string()))?;

        if content.len() > self.max_content_size {
            return Err(FetchError::ContentTooLarge(
                content.len(),
                self.max_content_size,
            ));
        }

        debug!(url = %url, bytes = content.len(), "Fetched page");

        Ok(FetchResult {
            content,
            content_type,
        })
    }

    /// Classify reqwest errors into our FetchError types
    fn classify_error(error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout;
        }

        let error_msg = error.to_string().to_lowercase();

        if error_msg.contains("connection refused") {
            return FetchError::ConnectionRefused;
        }

        if error_msg.contains("dns") || error_msg.contains("name resolution") {
            return FetchError::DnsError;
        }

        if error_msg.contains("ssl") || error_msg.contains("tls") || error_msg.contains("certificate") {
            return FetchError::SslError;
        }

        FetchError::NetworkError(error.to_string())
    }
}

/// Result of a successful HTTP fetch; only `200 OK` responses get this far
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub content: String,
    pub content_type: Option<String>,
}

/// Errors that can occur during HTTP fetching
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection refused - server not accepting connections")]
    ConnectionRefused,

    #[error("DNS resolution failed")]
    DnsError,

    #[error("SSL/TLS error - certificate or encryption issue")]
    SslError,

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),

    #[error("Failed to read response body: {0}")]
    BodyError(String),

    #[error("Content too large: {0} bytes (max: {1} bytes)")]
    ContentTooLarge(usize, usize),
}

impl FetchError {
    /// Check if this error is retryable (transient) or permanent
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout => true,
            FetchError::NetworkError(msg) => {
                let msg_lower = msg.to_lowercase();
                msg_lower.contains("timeout")
                    || msg_lower.contains("broken pipe")
                    || msg_lower.contains("connection reset")
                    || msg_lower.contains("temporary")
            }
            // Rate limiting and upstream hiccups clear up on their own
            FetchError::UnexpectedStatus(code) => matches!(code, 429 | 502 | 503 | 504),
            FetchError::ClientBuild(_) => false,
            FetchError::ConnectionRefused => false,
            FetchError::DnsError => false,
            FetchError::SslError => false,
            FetchError::BodyError(_) => false,
            FetchError::ContentTooLarge(_, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/ja/search/test", addr)
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let client = HttpClient::new("TestBot/1.0".to_string(), 5).unwrap();

        let result = client.fetch("not-a-url").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::new("TestBot/1.0".to_string(), 30).unwrap();
        assert_eq!(client.user_agent(), "TestBot/1.0");
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let body = r#"<ul><li><a href="/ja/items/1">A</a></li></ul>"#;
        let url = serve_once(http_response("200 OK", body)).await;
        let client = HttpClient::new("TestBot/1.0".to_string(), 5).unwrap();

        let result = client.fetch(&url).await.unwrap();

        assert_eq!(result.content, body);
        assert_eq!(
            result.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_fetch_non_ok_status_is_error() {
        let url = serve_once(http_response("404 Not Found", "")).await;
        let client = HttpClient::new("TestBot/1.0".to_string(), 5).unwrap();

        let err = client.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::UnexpectedStatus(404)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_rejects_oversized_body() {
        let body = "x".repeat(64);
        let url = serve_once(http_response("200 OK", &body)).await;
        let client = HttpClient::with_content_limit("TestBot/1.0".to_string(), 5, 16).unwrap();

        let err = client.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::ContentTooLarge(64, 16)));
    }

    #[tokio::test]
    async fn test_fetch_document_parses_html() {
        let body = r#"<html><head><title>Search</title></head><body></body></html>"#;
        let url = serve_once(http_response("200 OK", body)).await;
        let client = HttpClient::new("TestBot/1.0".to_string(), 5).unwrap();

        let document = client.fetch_document(&url).await.unwrap();
        let selector = scraper::Selector::parse("title").unwrap();
        let title: String = document.select(&selector).next().unwrap().text().collect();

        assert_eq!(title, "Search");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::UnexpectedStatus(503).is_retryable());
        assert!(FetchError::NetworkError("connection reset by peer".to_string()).is_retryable());
        assert!(!FetchError::UnexpectedStatus(403).is_retryable());
        assert!(!FetchError::DnsError.is_retryable());
        assert!(!FetchError::ContentTooLarge(2, 1).is_retryable());
    }
}
