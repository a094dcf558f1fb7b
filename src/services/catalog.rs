use std::sync::Arc;

use crate::{
    models::{Book, Category},
    services::providers::BookCatalog,
};

/// Default number of results for a free-text search
pub const SEARCH_MAX_RESULTS: u32 = 40;
/// Default number of results when browsing a category
pub const BROWSE_MAX_RESULTS: u32 = 10;

/// Searches the catalog by title, author or keyword
///
/// Any failure (network, bad status, malformed body, invalid input) yields an
/// empty list; callers treat "no books" as the only failure mode.
pub async fn search_books(
    catalog: Arc<dyn BookCatalog>,
    query: &str,
    max_results: u32,
) -> Vec<Book> {
    match catalog.search_volumes(query, max_results).await {
        Ok(books) => books,
        Err(e) => {
            tracing::warn!(
                error = %e,
                query = %query,
                provider = catalog.name(),
                "Catalog search failed, returning no results"
            );
            Vec::new()
        }
    }
}

/// Fetches books for one of the predefined genre shortcuts
pub async fn browse_category(
    catalog: Arc<dyn BookCatalog>,
    category: Category,
    max_results: u32,
) -> Vec<Book> {
    tracing::debug!(category = category.label(), "Browsing category");
    search_books(catalog, category.query(), max_results).await
}
