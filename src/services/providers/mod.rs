//! Book catalog provider abstraction
//!
//! Title search goes through a pluggable catalog so the HTTP layer and the
//! recommendation pipeline never talk to a concrete API directly.

use crate::{error::AppResult, models::Book};

pub mod google_books;

pub use google_books::GoogleBooksProvider;

/// Upper bound the Google Books API accepts for `maxResults`
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Trait for book catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookCatalog: Send + Sync {
    /// Search volumes by free text (title, author or keyword)
    ///
    /// Returns at most `max_results` books in catalog relevance order.
    async fn search_volumes(&self, query: &str, max_results: u32) -> AppResult<Vec<Book>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
