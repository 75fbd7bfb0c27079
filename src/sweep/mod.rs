pub mod ingestor;
pub mod orchestrator;

pub use ingestor::FeedIngestor;
pub use orchestrator::SweepOrchestrator;

use serde::{Deserialize, Serialize};

/// What a sweep does when an entry or a feed fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first error and return it
    #[default]
    Abort,
    /// Log the error and move on to the next entry or feed
    Continue,
}

/// Outcome of ingesting a single feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub feed_url: String,
    pub examined: usize,
    pub added: usize,
    pub existing: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub feeds: Vec<IngestReport>,
    pub failed_feeds: Vec<(String, String)>,
}

impl SweepReport {
    pub fn added(&self) -> usize {
        self.feeds.iter().map(|f| f.added).sum()
    }

    pub fn examined(&self) -> usize {
        self.feeds.iter().map(|f| f.examined).sum()
    }
}
