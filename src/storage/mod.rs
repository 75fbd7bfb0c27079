pub mod document;
pub mod traits;

pub use document::{DocumentStore, ARTICLE_KIND};
pub use traits::{ArticleStore, MemoryStore, SharedStore};
