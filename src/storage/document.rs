use std::collections::HashMap;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::feed::Article;
use crate::error::{Error, Result};
use crate::storage::traits::{oldest_titles, recent, ArticleStore};

/// Collection name every document is filed under.
pub const ARTICLE_KIND: &str = "title";

#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    kind: String,
    saved_at: DateTime<Utc>,
    documents: HashMap<String, Article>,
}

/// Title-keyed document collection persisted as a single JSON file.
///
/// Every mutation rewrites the file through a temporary sibling and a rename,
/// so a crashed write leaves the previous snapshot intact.
pub struct DocumentStore {
    path: PathBuf,
    documents: Mutex<HashMap<String, Article>>,
}

impl DocumentStore {
    /// Open the collection at `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::Storage(format!(
                        "Failed to create store directory '{}': {}",
                        parent.display(), e
                    )))?;
            }
        }

        let documents = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| Error::Storage(format!(
                    "Failed to read store '{}': {}",
                    path.display(), e
                )))?;

            let file: DocumentFile = serde_json::from_str(&content)?;
            if file.kind != ARTICLE_KIND {
                return Err(Error::Storage(format!(
                    "Store '{}' holds kind '{}', expected '{}'",
                    path.display(), file.kind, ARTICLE_KIND
                )));
            }

            tracing::debug!("Loaded {} articles from {}", file.documents.len(), path.display());
            file.documents
        } else {
            tracing::debug!("Store file does not exist yet: {}", path.display());
            HashMap::new()
        };

        Ok(Self {
            path,
            documents: Mutex::new(documents),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, documents: &HashMap<String, Article>) -> Result<()> {
        let file = DocumentFile {
            kind: ARTICLE_KIND.to_string(),
            saved_at: Utc::now(),
            documents: documents.clone(),
        };

        let json_content = serde_json::to_string_pretty(&file)?;

        let temp_file = self.path.with_extension("tmp");
        tokio::fs::write(&temp_file, json_content)
            .await
            .map_err(|e| Error::Storage(format!(
                "Failed to write store to '{}': {}",
                temp_file.display(), e
            )))?;

        tokio::fs::rename(&temp_file, &self.path)
            .await
            .map_err(|e| Error::Storage(format!(
                "Failed to rename store file '{}' to '{}': {}",
                temp_file.display(), self.path.display(), e
            )))?;

        Ok(())
    }
}

#[async_trait]
impl ArticleStore for DocumentStore {
    async fn put(&self, title: &str, article: &Article) -> Result<()> {
        let mut documents = self.documents.lock().await;

        // Only swap the new snapshot in once it is on disk
        let mut next = documents.clone();
        next.insert(title.to_string(), article.clone());
        self.persist(&next).await?;

        *documents = next;
        Ok(())
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Article>> {
        Ok(self.documents.lock().await.get(title).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Article>> {
        Ok(recent(self.documents.lock().await.values(), limit))
    }

    async fn delete_oldest(&self, limit: usize) -> Result<usize> {
        let mut documents = self.documents.lock().await;
        let doomed = oldest_titles(documents.values(), limit);

        if doomed.is_empty() {
            return Ok(0);
        }

        let mut next = documents.clone();
        for title in &doomed {
            next.remove(title);
        }

        self.persist(&next).await?;
        *documents = next;
        Ok(doomed.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.lock().await.len())
    }
}
