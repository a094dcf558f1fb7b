pub mod catalog;
pub mod neighbors;
pub mod providers;
pub mod recommendations;
pub mod stop_words;
pub mod tfidf;
pub mod title_match;

pub use providers::{BookCatalog, GoogleBooksProvider};
pub use recommendations::RecommendationSettings;
