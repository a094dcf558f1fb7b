use serde::Serialize;

use super::Book;

/// Books a user has liked during their session, in the order they were liked
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LikedBooks {
    books: Vec<Book>,
}

impl LikedBooks {
    pub fn new() -> Self {
        Self { books: Vec::new() }
    }

    /// Adds a book, returning `false` if a book with the same id is already liked
    pub fn add(&mut self, book: Book) -> bool {
        if self.contains(&book.id) {
            return false;
        }
        self.books.push(book);
        true
    }

    /// Removes a liked book by id
    pub fn remove(&mut self, book_id: &str) -> Option<Book> {
        let position = self.books.iter().position(|b| b.id == book_id)?;
        Some(self.books.remove(position))
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.books.iter().any(|b| b.id == book_id)
    }

    pub fn get(&self, book_id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == book_id)
    }

    pub fn titles(&self) -> Vec<String> {
        self.books.iter().map(|b| b.title.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
