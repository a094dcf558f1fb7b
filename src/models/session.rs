use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Book, Category, LikedBooks};

/// Per-user state kept in memory for the lifetime of a session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub liked: LikedBooks,
    pub last_query: Option<String>,
    pub search_results: Vec<Book>,
    pub last_category: Option<Category>,
    pub category_results: Vec<Book>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            liked: LikedBooks::new(),
            last_query: None,
            search_results: Vec::new(),
            last_category: None,
            category_results: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Replaces the current search results
    pub fn record_search(&mut self, query: &str, books: Vec<Book>) {
        self.last_query = Some(query.to_string());
        self.search_results = books;
        self.touch();
    }

    /// Replaces the current category results
    pub fn record_browse(&mut self, category: Category, books: Vec<Book>) {
        self.last_category = Some(category);
        self.category_results = books;
        self.touch();
    }

    /// Looks up a book the user has been shown, searching results, then
    /// category results, then liked books
    pub fn find_known(&self, book_id: &str) -> Option<&Book> {
        self.search_results
            .iter()
            .chain(self.category_results.iter())
            .find(|b| b.id == book_id)
            .or_else(|| self.liked.get(book_id))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_book;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.liked.is_empty());
        assert!(session.search_results.is_empty());
        assert!(session.last_query.is_none());
    }

    #[test]
    fn test_record_search_replaces_results() {
        let mut session = Session::new();
        session.record_search("dune", vec![test_book("a", "Dune", "")]);
        session.record_search("foundation", vec![test_book("b", "Foundation", "")]);

        assert_eq!(session.last_query.as_deref(), Some("foundation"));
        assert_eq!(session.search_results.len(), 1);
        assert_eq!(session.search_results[0].id, "b");
    }

    #[test]
    fn test_find_known_looks_everywhere() {
        let mut session = Session::new();
        session.record_search("q", vec![test_book("a", "From Search", "")]);
        session.record_browse(Category::History, vec![test_book("b", "From Browse", "")]);
        session.liked.add(test_book("c", "From Likes", ""));

        assert_eq!(session.find_known("a").unwrap().title, "From Search");
        assert_eq!(session.find_known("b").unwrap().title, "From Browse");
        assert_eq!(session.find_known("c").unwrap().title, "From Likes");
        assert!(session.find_known("z").is_none());
    }
}
