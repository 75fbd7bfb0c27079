use crate::config::ImageSettings;
use crate::content::{BROWSER_USER_AGENT, DEFAULT_MIN_IMAGE_BYTES, FALLBACK_IMAGE_URL};
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use select::document::Document;
use select::predicate::Name;
use std::time::Duration;
use tracing::{debug, info};

/// Picks a representative image for an article page.
///
/// Walks the page's `<img>` elements in document order and returns the first
/// absolute JPEG source whose download is larger than `min_bytes`. Nothing is
/// cached, so each call re-fetches the page and its candidates.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    client: Client,
    min_bytes: usize,
    fallback_url: String,
}

impl ImageResolver {
    pub fn new() -> Result<Self> {
        Self::build(
            BROWSER_USER_AGENT,
            Duration::from_secs(30),
            DEFAULT_MIN_IMAGE_BYTES,
            FALLBACK_IMAGE_URL.to_string(),
        )
    }

    pub fn from_settings(settings: &ImageSettings, timeout: Duration) -> Result<Self> {
        Self::build(
            &settings.user_agent,
            timeout,
            settings.min_bytes,
            settings.fallback_url.clone(),
        )
    }

    fn build(
        user_agent: &str,
        timeout: Duration,
        min_bytes: usize,
        fallback_url: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .default_headers(page_headers(user_agent)?)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            min_bytes,
            fallback_url,
        })
    }

    pub fn with_min_bytes(mut self, min_bytes: usize) -> Self {
        self.min_bytes = min_bytes;
        self
    }

    pub async fn resolve(&self, page_url: &str) -> Result<String> {
        debug!("Resolving image for: {}", page_url);

        let html = self.fetch_text(page_url).await?;

        for src in jpeg_candidates(&html) {
            let size = self.fetch_len(&src).await?;
            debug!("Candidate {} is {} bytes", src, size);

            if size > self.min_bytes {
                info!("Selected image {} for {}", src, page_url);
                return Ok(src);
            }
        }

        debug!("No qualifying image on {}, using fallback", page_url);
        Ok(self.fallback_url.clone())
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                url
            )));
        }

        Ok(response.text().await?)
    }

    async fn fetch_len(&self, url: &str) -> Result<usize> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "HTTP {} for image {}",
                response.status().as_u16(),
                url
            )));
        }

        Ok(response.bytes().await?.len())
    }
}

/// `src` values of `<img>` tags that look like absolute JPEG links, in document order.
fn jpeg_candidates(html: &str) -> Vec<String> {
    let document = Document::from(html);

    document
        .find(Name("img"))
        .filter_map(|node| node.attr("src"))
        .filter(|src| src.contains("http") && (src.contains("jpg") || src.contains("jpeg")))
        .map(|src| src.to_string())
        .collect()
}

fn page_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, agent);

    // Some origins vary their response on these even for server-side fetches
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-methods", HeaderValue::from_static("GET"));
    headers.insert("access-control-allow-headers", HeaderValue::from_static("Content-Type"));
    headers.insert("access-control-max-age", HeaderValue::from_static("3600"));

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_candidates_filter_and_order() {
        let html = r#"<html><body>
            <img src="/relative/photo.jpg">
            <img alt="no source">
            <img src="https://cdn.example.com/logo.png">
            <img src="https://cdn.example.com/a.jpg">
            <img src="http://cdn.example.com/b.jpeg?w=800">
        </body></html>"#;

        assert_eq!(
            jpeg_candidates(html),
            vec![
                "https://cdn.example.com/a.jpg".to_string(),
                "http://cdn.example.com/b.jpeg?w=800".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fallback_when_no_qualifying_image() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><img src="/icon.jpg"><img src="https://example.com/x.gif"></body></html>"#,
            ))
            .mount(&mock_server)
            .await;

        let resolver = ImageResolver::new().unwrap();
        let image = resolver.resolve(&format!("{}/story", mock_server.uri())).await.unwrap();

        assert_eq!(image, FALLBACK_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_first_image_over_threshold_wins() {
        let mock_server = MockServer::start().await;
        let small = format!("{}/img/small.jpg", mock_server.uri());
        let large = format!("{}/img/large.jpg", mock_server.uri());
        let later = format!("{}/img/later.jpg", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<html><body><img src="{}"><img src="{}"><img src="{}"></body></html>"#,
                small, large, later
            )))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/img/small.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1_000]))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/img/large.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 40_001]))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/img/later.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 90_000]))
            .expect(0)
            .mount(&mock_server)
            .await;

        let resolver = ImageResolver::new().unwrap();
        let image = resolver.resolve(&format!("{}/story", mock_server.uri())).await.unwrap();

        assert_eq!(image, large);
    }

    #[tokio::test]
    async fn test_exactly_threshold_is_not_enough() {
        let mock_server = MockServer::start().await;
        let edge = format!("{}/img/edge.jpg", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(format!(r#"<img src="{}">"#, edge)),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/img/edge.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 40_000]))
            .mount(&mock_server)
            .await;

        let resolver = ImageResolver::new().unwrap();
        let image = resolver.resolve(&format!("{}/story", mock_server.uri())).await.unwrap();

        assert_eq!(image, FALLBACK_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_sends_browser_and_cors_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/story"))
            .and(header("user-agent", BROWSER_USER_AGENT))
            .and(header("access-control-allow-origin", "*"))
            .and(header("access-control-max-age", "3600"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = ImageResolver::new().unwrap();
        let image = resolver.resolve(&format!("{}/story", mock_server.uri())).await.unwrap();
        assert_eq!(image, FALLBACK_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_unreachable_candidate_is_an_error() {
        let mock_server = MockServer::start().await;
        let missing = format!("{}/img/missing.jpg", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(format!(r#"<img src="{}">"#, missing)),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/img/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let resolver = ImageResolver::new().unwrap();
        let result = resolver.resolve(&format!("{}/story", mock_server.uri())).await;

        assert!(matches!(result, Err(Error::HttpError(_))));
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let mock_server = MockServer::start().await;
        let small = format!("{}/img/small.jpg", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(format!(r#"<img src="{}">"#, small)),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/img/small.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 500]))
            .mount(&mock_server)
            .await;

        let resolver = ImageResolver::new().unwrap().with_min_bytes(100);
        let image = resolver.resolve(&format!("{}/story", mock_server.uri())).await.unwrap();

        assert_eq!(image, small);
    }
}
