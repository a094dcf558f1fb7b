//! Fuzzy title matching based on Ratcliff/Obershelp "gestalt" similarity.

use std::collections::HashMap;

use crate::models::Book;

/// Minimum similarity for a title to count as a match
pub const DEFAULT_CUTOFF: f64 = 0.4;

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`,
/// preferring the earliest start in `a`, then in `b`
fn find_longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                next_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next_j2len;
    }

    (best_i, best_j, best_size)
}

/// Total number of characters in matching blocks between `a` and `b`
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = find_longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Similarity in `[0, 1]`: twice the matched characters over the total length.
///
/// Not symmetric in general; `a` is the candidate and `b` the word looked up.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Up to `n` candidates scoring at least `cutoff` against `word`, best first.
/// Equal scores order the lexically greater candidate first.
pub fn get_close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (similarity_ratio(candidate, word), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));
    scored.truncate(n);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Index of the first book carrying the title that best matches `title`
pub fn best_title_match(title: &str, books: &[Book], cutoff: f64) -> Option<usize> {
    let best = *get_close_matches(title, books.iter().map(|b| b.title.as_str()), 1, cutoff)
        .first()?;
    books.iter().position(|b| b.title == best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_book;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert!(approx(similarity_ratio("dune", "dune"), 1.0));
        assert!(approx(similarity_ratio("abc", "xyz"), 0.0));
        assert!(approx(similarity_ratio("", ""), 1.0));
        assert!(approx(similarity_ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_ratio_known_values() {
        // "abcd" vs "bcde": block "bcd" -> 2*3/8
        assert!(approx(similarity_ratio("abcd", "bcde"), 0.75));
        // "apple" vs "ape": blocks "ap" + "e" -> 2*3/8
        assert!(approx(similarity_ratio("apple", "ape"), 0.75));
    }

    #[test]
    fn test_close_matches_ordered_by_score() {
        let candidates = ["ape", "apple", "peach", "puppy"];
        let matches = get_close_matches("appel", candidates, 3, 0.6);
        assert_eq!(matches, vec!["apple", "ape"]);
    }

    #[test]
    fn test_close_matches_respects_limit_and_cutoff() {
        let candidates = ["harry potter", "harry potter 2", "war and peace"];
        assert_eq!(
            get_close_matches("harry potter", candidates, 1, 0.4),
            vec!["harry potter"]
        );
        assert!(get_close_matches("zzz", candidates, 3, 0.4).is_empty());
        assert!(get_close_matches("harry potter", candidates, 0, 0.4).is_empty());
    }

    #[test]
    fn test_best_title_match_exact() {
        let books = vec![
            test_book("1", "The Hobbit", ""),
            test_book("2", "The Lord of the Rings", ""),
        ];
        assert_eq!(best_title_match("The Lord of the Rings", &books, 0.4), Some(1));
    }

    #[test]
    fn test_best_title_match_fuzzy() {
        let books = vec![
            test_book("1", "Pride and Prejudice", ""),
            test_book("2", "The Great Gatsby", ""),
        ];
        assert_eq!(best_title_match("great gatsby", &books, 0.4), Some(1));
    }

    #[test]
    fn test_best_title_match_returns_first_duplicate() {
        let books = vec![
            test_book("1", "Dracula", ""),
            test_book("2", "Dracula", ""),
        ];
        assert_eq!(best_title_match("Dracula", &books, 0.4), Some(0));
    }

    #[test]
    fn test_best_title_match_none_below_cutoff() {
        let books = vec![test_book("1", "Moby Dick", "")];
        assert_eq!(best_title_match("Quantum Field Theory", &books, 0.4), None);
    }
}
