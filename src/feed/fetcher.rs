use crate::error::{Error, Result};
use crate::feed::parser::FeedParser;
use crate::feed::ParsedFeed;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    timeout_duration: Duration,
    user_agent: String,
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_duration: Duration::from_secs(30),
            user_agent: format!("news-sweep/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_duration = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Download and parse `url`. Every call hits the network and yields a fresh entry list.
    pub async fn fetch_feed(&self, url: &str) -> Result<ParsedFeed> {
        debug!("Fetching feed from: {}", url);

        let parser = FeedParser::new();
        parser.validate_feed_url(url)?;

        let response = timeout(self.timeout_duration, self.fetch_response(url))
            .await
            .map_err(|_| Error::Timeout(format!("Request to {} timed out", url)))??;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "HTTP {} for {}: {}",
                response.status().as_u16(),
                url,
                response.status().canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let content = timeout(self.timeout_duration, response.bytes())
            .await
            .map_err(|_| Error::Timeout(format!("Reading {} timed out", url)))?
            .map_err(|e| Error::HttpError(format!("Failed to read response body: {}", e)))?;

        debug!("Downloaded {} bytes from {}", content.len(), url);

        parser.parse_feed(std::io::Cursor::new(content))
    }

    async fn fetch_response(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/rss+xml, application/atom+xml, application/xml, text/xml, */*")
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("Request failed: {}", e)))?;

        Ok(response)
    }
}
