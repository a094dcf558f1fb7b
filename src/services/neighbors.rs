use super::tfidf::SparseVector;

/// A neighbouring row and its cosine distance from the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// Cosine distance in `[0, 2]`; a zero vector is orthogonal to everything
pub fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 1.0;
    }
    (1.0 - a.dot(b) / denom).clamp(0.0, 2.0)
}

/// Brute-force k-nearest-neighbour search under cosine distance
pub struct NearestNeighbors<'a> {
    rows: &'a [SparseVector],
}

impl<'a> NearestNeighbors<'a> {
    pub fn fit(rows: &'a [SparseVector]) -> Self {
        Self { rows }
    }

    /// Returns up to `k` rows closest to `query`, nearest first, ties by row index
    pub fn kneighbors(&self, query: &SparseVector, k: usize) -> Vec<Neighbor> {
        let mut neighbors: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: cosine_distance(query, row),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.index.cmp(&b.index))
        });
        neighbors.truncate(k.min(self.rows.len()));
        neighbors
    }

    /// Neighbours of a fitted row, excluding the row itself
    pub fn kneighbors_of_row(&self, row: usize, k: usize) -> Vec<Neighbor> {
        let Some(query) = self.rows.get(row) else {
            return Vec::new();
        };
        let mut neighbors = self.kneighbors(query, k.saturating_add(1));
        neighbors.retain(|n| n.index != row);
        neighbors.truncate(k);
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tfidf::TfidfVectorizer;

    #[test]
    fn test_zero_vector_distance_is_one() {
        let zero = SparseVector::default();
        let other = SparseVector::from_pairs(vec![(0, 1.0)]);
        assert_eq!(cosine_distance(&zero, &other), 1.0);
        assert_eq!(cosine_distance(&zero, &zero), 1.0);
    }

    #[test]
    fn test_nearest_is_most_similar() {
        let matrix = TfidfVectorizer::new().fit_transform(&[
            "wizard school magic spells",
            "magic spells and wizard duels",
            "stock market investing",
            "investing in index funds",
        ]);
        let nn = NearestNeighbors::fit(matrix.rows());

        let neighbors = nn.kneighbors_of_row(0, 2);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].index, 1);
        assert!(neighbors[0].distance <= neighbors[1].distance);
    }

    #[test]
    fn test_kneighbors_includes_self_first() {
        let matrix = TfidfVectorizer::new().fit_transform(&["alpha beta", "gamma delta"]);
        let nn = NearestNeighbors::fit(matrix.rows());
        let neighbors = nn.kneighbors(&matrix.rows()[1], 1);
        assert_eq!(neighbors[0].index, 1);
        assert!(neighbors[0].distance.abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_rows_do_not_evict_the_real_neighbours() {
        let matrix = TfidfVectorizer::new().fit_transform(&[
            "pirates treasure island",
            "pirates treasure island",
            "treasure hunting",
        ]);
        let nn = NearestNeighbors::fit(matrix.rows());

        let neighbors = nn.kneighbors_of_row(1, 2);
        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_k_is_clamped_to_row_count() {
        let matrix = TfidfVectorizer::new().fit_transform(&["one book", "another book"]);
        let nn = NearestNeighbors::fit(matrix.rows());
        assert_eq!(nn.kneighbors_of_row(0, 10).len(), 1);
        assert!(nn.kneighbors_of_row(5, 3).is_empty());
    }
}
