use crate::content::ImageResolver;
use crate::error::{Error, Result};
use crate::feed::fetcher::FeedFetcher;
use crate::feed::{Article, FeedEntry};
use crate::storage::SharedStore;
use crate::sweep::{FailurePolicy, IngestReport};
use tracing::{debug, info, warn};

/// Outcome for one examined entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryOutcome {
    Added,
    Existing,
}

/// Pulls a feed into the article store, one title at a time.
pub struct FeedIngestor {
    fetcher: FeedFetcher,
    images: ImageResolver,
    store: SharedStore,
    policy: FailurePolicy,
}

impl FeedIngestor {
    pub fn new(fetcher: FeedFetcher, images: ImageResolver, store: SharedStore) -> Self {
        Self {
            fetcher,
            images,
            store,
            policy: FailurePolicy::Abort,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Examine up to `limit` entries of `feed_url` in feed order, storing the ones whose title is new.
    ///
    /// `limit` counts every examined entry, including titles that are already
    /// stored, so a feed whose head is unchanged never reaches older entries.
    pub async fn ingest(&self, feed_url: &str, limit: usize) -> Result<IngestReport> {
        let feed = self.fetcher.fetch_feed(feed_url).await?;
        debug!("Parsed {} entries from {}", feed.entries.len(), feed_url);

        let mut report = IngestReport {
            feed_url: feed_url.to_string(),
            ..Default::default()
        };

        for entry in feed.entries.iter().take(limit) {
            report.examined += 1;

            match self.ingest_entry(entry).await {
                Ok(EntryOutcome::Added) => report.added += 1,
                Ok(EntryOutcome::Existing) => report.existing += 1,
                Err(e) if self.policy == FailurePolicy::Continue => {
                    warn!("Skipping entry {:?} from {}: {}", entry.title, feed_url, e);
                    report.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Ingested {}: {} examined, {} added, {} existing, {} failed",
            feed_url, report.examined, report.added, report.existing, report.failed
        );

        Ok(report)
    }

    async fn ingest_entry(&self, entry: &FeedEntry) -> Result<EntryOutcome> {
        let title = entry.canonical_title()?;

        if self.store.get_by_title(&title).await?.is_some() {
            debug!("Article already stored: {}", title);
            return Ok(EntryOutcome::Existing);
        }

        let published_at = entry
            .published
            .ok_or_else(|| Error::InvalidDate(format!("'{}' has no parseable publication date", title)))?;

        let link = entry
            .link
            .clone()
            .ok_or_else(|| Error::FeedParse(format!("'{}' has no link", title)))?;

        let image = self.images.resolve(&link).await?;
        let summary = entry.summary.clone().unwrap_or_default();

        let article = Article::new(title, link, summary, image, published_at)?;
        self.store.put(&article.title, &article).await?;

        info!("Added article: {}", article.title);
        Ok(EntryOutcome::Added)
    }
}
