use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Book, LikedBooks, Recommendation, RecommendationSet},
    services::{
        neighbors::NearestNeighbors,
        tfidf::{TfidfVectorizer, DEFAULT_MAX_FEATURES},
        title_match::{best_title_match, DEFAULT_CUTOFF},
    },
};

pub const MIN_TOP_K: usize = 3;
pub const MAX_TOP_K: usize = 20;
pub const DEFAULT_TOP_K: usize = 6;

/// Tunables for the recommendation pipeline
#[derive(Debug, Clone, Copy)]
pub struct RecommendationSettings {
    pub max_features: usize,
    pub title_match_cutoff: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            title_match_cutoff: DEFAULT_CUTOFF,
        }
    }
}

/// Search results followed by liked books, keeping the first book for each id
pub fn build_pool(search_results: &[Book], liked: &LikedBooks) -> Vec<Book> {
    let mut seen = HashSet::new();
    search_results
        .iter()
        .chain(liked.iter())
        .filter(|book| seen.insert(book.id.clone()))
        .cloned()
        .collect()
}

/// Content-based recommendations for a liked book
///
/// Vectorizes title, authors, description and categories of every pooled
/// book with TF-IDF, matches `selected_title` to a pooled book, and returns
/// its `top_k` nearest neighbours by cosine distance. The selected book
/// itself is never part of the result.
pub fn recommend(
    search_results: &[Book],
    liked: &LikedBooks,
    selected_title: &str,
    top_k: usize,
    settings: &RecommendationSettings,
) -> AppResult<RecommendationSet> {
    if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
        return Err(AppError::InvalidInput(format!(
            "top_k must be between {} and {}",
            MIN_TOP_K, MAX_TOP_K
        )));
    }

    // 1. Build the candidate pool
    let pool = build_pool(search_results, liked);
    if pool.len() < 2 {
        return Err(AppError::InvalidInput(
            "Need more books to generate recommendations.".to_string(),
        ));
    }

    // 2. Vectorize book metadata
    let documents: Vec<String> = pool.iter().map(Book::document).collect();
    let matrix = TfidfVectorizer::new()
        .with_max_features(Some(settings.max_features))
        .fit_transform(&documents);

    // 3. Locate the selected book
    let index = best_title_match(selected_title, &pool, settings.title_match_cutoff)
        .ok_or_else(|| {
            AppError::NotFound("Could not match this book. Try another selection.".to_string())
        })?;

    // 4. Query nearest neighbours, excluding the selected book
    let neighbors = NearestNeighbors::fit(matrix.rows()).kneighbors_of_row(index, top_k);

    let recommendations: Vec<Recommendation> = neighbors
        .iter()
        .enumerate()
        .map(|(position, neighbor)| Recommendation {
            rank: position + 1,
            similarity: neighbor.similarity(),
            book: pool[neighbor.index].clone(),
        })
        .collect();

    tracing::info!(
        selected = %pool[index].title,
        pool_size = pool.len(),
        vocabulary = matrix.vocabulary().len(),
        returned = recommendations.len(),
        "Recommendations generated"
    );

    Ok(RecommendationSet {
        based_on: pool[index].clone(),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_book;

    fn catalog() -> Vec<Book> {
        vec![
            test_book("hp1", "Harry Potter and the Philosopher's Stone", "A young wizard attends a school of magic and wizardry."),
            test_book("hp2", "Harry Potter and the Chamber of Secrets", "The young wizard returns to the school of magic."),
            test_book("lotr", "The Fellowship of the Ring", "A hobbit begins a quest to destroy a ring of dark magic."),
            test_book("fin", "The Intelligent Investor", "Value investing and stock market strategy."),
            test_book("cook", "Salt Fat Acid Heat", "Mastering the elements of good cooking."),
        ]
    }

    fn liked_with(book: Book) -> LikedBooks {
        let mut liked = LikedBooks::new();
        liked.add(book);
        liked
    }

    #[test]
    fn test_pool_deduplicates_keeping_first() {
        let search = catalog();
        let mut liked_copy = test_book("hp1", "Harry Potter (liked copy)", "");
        liked_copy.description = "different".to_string();
        let mut liked = liked_with(liked_copy);
        liked.add(test_book("extra", "Extra Book", ""));

        let pool = build_pool(&search, &liked);
        assert_eq!(pool.len(), 6);
        assert_eq!(pool[0].title, "Harry Potter and the Philosopher's Stone");
        assert_eq!(pool[5].id, "extra");
    }

    #[test]
    fn test_recommends_similar_books_first() {
        let search = catalog();
        let liked = liked_with(search[0].clone());

        let set = recommend(
            &search,
            &liked,
            "Harry Potter and the Philosopher's Stone",
            3,
            &RecommendationSettings::default(),
        )
        .unwrap();

        assert_eq!(set.based_on.id, "hp1");
        assert_eq!(set.recommendations.len(), 3);
        assert_eq!(set.recommendations[0].book.id, "hp2");
        assert_eq!(set.recommendations[0].rank, 1);
        assert!(set.recommendations.iter().all(|r| r.book.id != "hp1"));
    }

    #[test]
    fn test_similarities_are_non_increasing() {
        let search = catalog();
        let liked = liked_with(search[2].clone());
        let set = recommend(
            &search,
            &liked,
            "The Fellowship of the Ring",
            4,
            &RecommendationSettings::default(),
        )
        .unwrap();

        for pair in set.recommendations.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        for (i, rec) in set.recommendations.iter().enumerate() {
            assert_eq!(rec.rank, i + 1);
        }
    }

    #[test]
    fn test_result_bounded_by_pool_size() {
        let search = catalog()[..3].to_vec();
        let liked = liked_with(search[0].clone());
        let set = recommend(
            &search,
            &liked,
            "Harry Potter and the Philosopher's Stone",
            20,
            &RecommendationSettings::default(),
        )
        .unwrap();
        assert_eq!(set.recommendations.len(), 2);
    }

    #[test]
    fn test_pool_too_small() {
        let liked = liked_with(test_book("solo", "Lonely Book", "alone"));
        let result = recommend(&[], &liked, "Lonely Book", 6, &RecommendationSettings::default());
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_liked_books_alone_can_form_a_pool() {
        let mut liked = LikedBooks::new();
        liked.add(test_book("a", "Space Opera", "galaxy starships empire"));
        liked.add(test_book("b", "Galactic Empire", "galaxy empire politics"));
        let set = recommend(&[], &liked, "Space Opera", 3, &RecommendationSettings::default())
            .unwrap();
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].book.id, "b");
        assert!(set.recommendations[0].similarity > 0.0);
    }

    #[test]
    fn test_unmatched_title_is_not_found() {
        let search = catalog();
        let liked = liked_with(search[0].clone());
        let result = recommend(&search, &liked, "zzzzqqqq", 6, &RecommendationSettings::default());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_top_k_out_of_range() {
        let search = catalog();
        let liked = liked_with(search[0].clone());
        for top_k in [0, 2, 21] {
            let result = recommend(
                &search,
                &liked,
                "Harry Potter",
                top_k,
                &RecommendationSettings::default(),
            );
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_unrelated_books_have_zero_similarity() {
        let search = vec![
            test_book("a", "Gardening", "roses tulips"),
            test_book("b", "Astronomy", "telescopes comets"),
        ];
        let liked = LikedBooks::new();
        let set = recommend(&search, &liked, "Gardening", 3, &RecommendationSettings::default())
            .unwrap();
        assert_eq!(set.recommendations.len(), 1);
        assert!(set.recommendations[0].similarity.abs() < 1e-9);
    }
}
