use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::content::ImageResolver;
use crate::error::Result;
use crate::feed::fetcher::FeedFetcher;
use crate::storage::SharedStore;
use crate::sweep::{FailurePolicy, FeedIngestor, SweepReport};

/// Runs the update and cleanup sweeps over a fixed feed list.
///
/// Feeds are ingested strictly in list order, one after another.
pub struct SweepOrchestrator {
    ingestor: FeedIngestor,
    feed_urls: Vec<String>,
    per_feed_limit: usize,
    retention_bound: usize,
    policy: FailurePolicy,
}

impl SweepOrchestrator {
    pub fn new(
        ingestor: FeedIngestor,
        feed_urls: Vec<String>,
        per_feed_limit: usize,
        retention_bound: usize,
    ) -> Self {
        Self {
            ingestor,
            feed_urls,
            per_feed_limit,
            retention_bound,
            policy: FailurePolicy::Abort,
        }
    }

    /// Wire the fetcher, image resolver and ingestor from configuration around an existing store.
    pub fn from_config(config: &Config, store: SharedStore) -> Result<Self> {
        let timeout = Duration::from_secs(config.settings.timeout);

        let fetcher = FeedFetcher::new()?
            .with_timeout(timeout)
            .with_user_agent(config.settings.user_agent.clone());
        let images = ImageResolver::from_settings(&config.images, timeout)?;
        let ingestor = FeedIngestor::new(fetcher, images, store)
            .with_policy(config.settings.failure_policy);

        Ok(Self::new(
            ingestor,
            config.feeds.urls.clone(),
            config.feeds.per_feed_limit,
            config.store.retention_bound,
        )
        .with_policy(config.settings.failure_policy))
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn feed_urls(&self) -> &[String] {
        &self.feed_urls
    }

    /// Ingest every configured feed with the per-feed limit.
    pub async fn update(&self) -> Result<SweepReport> {
        info!("Starting update sweep over {} feeds", self.feed_urls.len());
        let mut report = SweepReport::default();

        for url in &self.feed_urls {
            match self.ingestor.ingest(url, self.per_feed_limit).await {
                Ok(feed_report) => report.feeds.push(feed_report),
                Err(e) if self.policy == FailurePolicy::Continue => {
                    warn!("Feed {} failed, continuing: {}", url, e);
                    report.failed_feeds.push((url.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Update sweep finished: {} examined, {} added, {} feeds failed",
            report.examined(), report.added(), report.failed_feeds.len()
        );
        Ok(report)
    }

    /// Trim the oldest articles, up to the retention bound.
    pub async fn cleanup(&self) -> Result<usize> {
        let removed = self.ingestor.store().delete_oldest(self.retention_bound).await?;
        info!("Cleanup sweep removed {} articles", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::feed::Article;
    use crate::storage::MemoryStore;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::Arc;

    fn orchestrator(store: SharedStore, urls: Vec<String>, bound: usize) -> SweepOrchestrator {
        let ingestor = FeedIngestor::new(
            FeedFetcher::new().unwrap(),
            ImageResolver::new().unwrap(),
            store,
        );
        SweepOrchestrator::new(ingestor, urls, 3, bound)
    }

    #[tokio::test]
    async fn test_cleanup_removes_bound_oldest() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for i in 0..60 {
            let a = Article::new(
                format!("Story {:02}", i),
                format!("https://example.com/{}", i),
                String::new(),
                "https://example.com/lead.jpg".to_string(),
                base + ChronoDuration::minutes(i),
            ).unwrap();
            store.put(&a.title, &a).await.unwrap();
        }

        let sweeps = orchestrator(store.clone(), Vec::new(), 50);
        assert_eq!(sweeps.cleanup().await.unwrap(), 50);

        let remaining = store.list_recent(100).await.unwrap();
        assert_eq!(remaining.len(), 10);
        assert!(remaining.iter().all(|a| a.published_at >= base + ChronoDuration::minutes(50)));
    }

    #[tokio::test]
    async fn test_update_aborts_on_first_bad_feed() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let sweeps = orchestrator(store, vec!["ftp://example.com/feed.xml".to_string()], 50);

        assert!(matches!(sweeps.update().await, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_update_continue_policy_records_failures() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let sweeps = orchestrator(
            store,
            vec!["ftp://example.com/a.xml".to_string(), "ftp://example.com/b.xml".to_string()],
            50,
        )
        .with_policy(FailurePolicy::Continue);

        let report = sweeps.update().await.unwrap();
        assert_eq!(report.failed_feeds.len(), 2);
        assert!(report.feeds.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_feeds() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let config = Config::default();

        let sweeps = SweepOrchestrator::from_config(&config, store).unwrap();
        assert_eq!(sweeps.feed_urls(), config.feeds.urls.as_slice());
    }
}
