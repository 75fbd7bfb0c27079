use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::feed::Article;
use crate::error::Result;

/// Persistence facade over a title-keyed document collection.
///
/// The ingestor checks `get_by_title` before `put`, but nothing here makes the
/// pair atomic: two concurrent sweeps may both see a title as absent.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Store an article under `title`, replacing any existing document
    async fn put(&self, title: &str, article: &Article) -> Result<()>;

    /// Point lookup by title
    async fn get_by_title(&self, title: &str) -> Result<Option<Article>>;

    /// Newest `limit` articles, newest first
    async fn list_recent(&self, limit: usize) -> Result<Vec<Article>>;

    /// Delete the oldest `limit` articles and return how many were removed
    async fn delete_oldest(&self, limit: usize) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

pub type SharedStore = Arc<dyn ArticleStore>;

/// Newest first; equal timestamps fall back to title so listings are stable.
pub(crate) fn newest_first(a: &Article, b: &Article) -> Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| a.title.cmp(&b.title))
}

pub(crate) fn oldest_first(a: &Article, b: &Article) -> Ordering {
    a.published_at
        .cmp(&b.published_at)
        .then_with(|| a.title.cmp(&b.title))
}

/// Titles of the `limit` oldest documents in `articles`.
pub(crate) fn oldest_titles<'a, I>(articles: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Article>,
{
    let mut sorted: Vec<&Article> = articles.into_iter().collect();
    sorted.sort_by(|a, b| oldest_first(a, b));
    sorted
        .into_iter()
        .take(limit)
        .map(|a| a.title.clone())
        .collect()
}

pub(crate) fn recent<'a, I>(articles: I, limit: usize) -> Vec<Article>
where
    I: IntoIterator<Item = &'a Article>,
{
    let mut sorted: Vec<&Article> = articles.into_iter().collect();
    sorted.sort_by(|a, b| newest_first(a, b));
    sorted.into_iter().take(limit).cloned().collect()
}

/// Memory-only store for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    articles: RwLock<HashMap<String, Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn put(&self, title: &str, article: &Article) -> Result<()> {
        self.articles.write().insert(title.to_string(), article.clone());
        Ok(())
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Article>> {
        Ok(self.articles.read().get(title).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Article>> {
        Ok(recent(self.articles.read().values(), limit))
    }

    async fn delete_oldest(&self, limit: usize) -> Result<usize> {
        let mut articles = self.articles.write();
        let doomed = oldest_titles(articles.values(), limit);

        for title in &doomed {
            articles.remove(title);
        }

        Ok(doomed.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.articles.read().len())
    }
}
