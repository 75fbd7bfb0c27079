use crate::feed::{FeedEntry, ParsedFeed};
use crate::error::{Error, Result};
use feed_rs::parser as feed_parser;
use std::io::Read;

pub struct FeedParser;

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS or Atom document into entries, keeping the feed's native order.
    ///
    /// Publication timestamps are normalized to UTC; an entry without a
    /// `published` date falls back to `updated`. The entry link is the
    /// `alternate` one when the entry carries several.
    pub fn parse_feed<R: Read>(&self, reader: R) -> Result<ParsedFeed> {
        let feed = feed_parser::parse(reader)
            .map_err(|e| Error::FeedParse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content).unwrap_or_else(|| "Untitled Feed".to_string());

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| FeedEntry {
                title: entry.title.map(|t| t.content),
                link: entry
                    .links
                    .iter()
                    .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
                    .or_else(|| entry.links.first())
                    .map(|l| l.href.clone()),
                summary: entry.summary.map(|s| s.content),
                published: entry.published.or(entry.updated),
            })
            .collect();

        Ok(ParsedFeed { title, entries })
    }

    pub fn validate_feed_url(&self, url: &str) -> Result<()> {
        let parsed_url = url::Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("Invalid URL: {}", e)))?;

        match parsed_url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::InvalidUrl(format!("Unsupported scheme: {}", scheme))),
        }
    }
}
