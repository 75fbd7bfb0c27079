pub mod fetcher;
pub mod parser;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// A stored news article, keyed by its decoded title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub image: String,
    pub credit: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: String,
    pub entries: Vec<FeedEntry>,
}

/// One item of an RSS/Atom document, before any store lookup.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Article {
    /// Build an article, deriving `credit` from the link host.
    ///
    /// Fails when the title or image is empty or the link has no host.
    pub fn new(
        title: String,
        link: String,
        summary: String,
        image: String,
        published_at: DateTime<Utc>,
    ) -> Result<Self> {
        if title.trim().is_empty() {
            return Err(Error::InvalidArticle("title is empty".to_string()));
        }

        if image.is_empty() {
            return Err(Error::InvalidArticle(format!("no image for '{}'", title)));
        }

        let credit = credit_for(&link)?;

        Ok(Self {
            title,
            link,
            summary,
            image,
            credit,
            published_at,
        })
    }
}

/// Network location of `link`, used for attribution.
pub fn credit_for(link: &str) -> Result<String> {
    let parsed = url::Url::parse(link)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", link, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(format!("no host in {}", link)))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

impl FeedEntry {
    /// Title with HTML entities decoded, which is the article's store key.
    pub fn canonical_title(&self) -> Result<String> {
        let raw = self
            .title
            .as_deref()
            .ok_or_else(|| Error::FeedParse("entry has no title".to_string()))?;

        Ok(html_escape::decode_html_entities(raw).into_owned())
    }
}
