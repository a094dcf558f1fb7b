use serde::{Deserialize, Serialize};

/// Genre shortcuts offered for browsing the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Fiction,
    ScienceFiction,
    Mystery,
    Romance,
    Business,
    SelfHelp,
    History,
    Biography,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Fiction,
        Category::ScienceFiction,
        Category::Mystery,
        Category::Romance,
        Category::Business,
        Category::SelfHelp,
        Category::History,
        Category::Biography,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::ScienceFiction => "Science Fiction",
            Category::Mystery => "Mystery",
            Category::Romance => "Romance",
            Category::Business => "Business",
            Category::SelfHelp => "Self-Help",
            Category::History => "History",
            Category::Biography => "Biography",
        }
    }

    /// Free-text query sent to the catalog when browsing this category
    pub fn query(&self) -> &'static str {
        match self {
            Category::Fiction => "fiction",
            Category::ScienceFiction => "science fiction",
            Category::Mystery => "mystery thriller",
            Category::Romance => "romance",
            Category::Business => "business",
            Category::SelfHelp => "self-help",
            Category::History => "history",
            Category::Biography => "biography",
        }
    }
}
