use serde::{Deserialize, Serialize};

pub mod category;
pub mod liked_books;
pub mod session;

pub use category::Category;
pub use liked_books::LikedBooks;
pub use session::Session;

/// Title used when the catalog omits one
pub const UNTITLED: &str = "No Title";

/// A book record returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub categories: Vec<String>,
    pub thumbnail: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub rating: Option<f32>,
}

impl Book {
    /// Authors joined for display, e.g. "Terry Pratchett, Neil Gaiman"
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    pub fn categories_display(&self) -> String {
        self.categories.join(", ")
    }

    /// Text fed to the TF-IDF vectorizer: title, authors, description, categories
    pub fn document(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.authors_display(),
            self.description,
            self.categories_display()
        )
    }
}

// ============================================================================
// Google Books API Types
// ============================================================================

/// Raw response from GET /books/v1/volumes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVolumesResponse {
    #[serde(default)]
    pub total_items: Option<u64>,
    /// Kept raw so one malformed volume does not fail the whole page
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVolume {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub volume_info: Option<ApiVolumeInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub image_links: Option<ApiImageLinks>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Error returned when a volume cannot become a [`Book`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("volume has no id")]
pub struct MissingVolumeId;

impl TryFrom<ApiVolume> for Book {
    type Error = MissingVolumeId;

    fn try_from(volume: ApiVolume) -> Result<Self, Self::Error> {
        let id = volume.id.filter(|id| !id.is_empty()).ok_or(MissingVolumeId)?;
        let info = volume.volume_info.unwrap_or_default();

        Ok(Book {
            id,
            title: info.title.unwrap_or_else(|| UNTITLED.to_string()),
            authors: info.authors,
            description: info.description.unwrap_or_default(),
            categories: info.categories,
            thumbnail: info.image_links.and_then(|links| links.thumbnail),
            published_date: info.published_date,
            page_count: info.page_count,
            rating: info.average_rating,
        })
    }
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// A single recommended book
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    /// 1-based position in the list
    pub rank: usize,
    /// Cosine similarity to the selected book, in [0, 1]
    pub similarity: f64,
    pub book: Book,
}

/// Recommendations computed for one liked book
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSet {
    pub based_on: Book,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
pub(crate) fn test_book(id: &str, title: &str, description: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        authors: Vec::new(),
        description: description.to_string(),
        categories: Vec::new(),
        thumbnail: None,
        published_date: None,
        page_count: None,
        rating: None,
    }
}
