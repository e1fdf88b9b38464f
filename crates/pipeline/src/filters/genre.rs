//! Filter to keep only movies whose genres contain a substring.

use crate::traits::Filter;
use data_loader::Catalog;
use similarity::Candidate;

/// Keeps candidates whose genre text contains the needle, case-insensitively.
///
/// The genre text is the movie's genre labels joined by spaces, so
/// "sci" matches "sci-fi" and "children comedy" matches a movie tagged
/// with those two genres in that order.
pub struct GenreFilter {
    needle: String,
}

impl GenreFilter {
    pub fn new(genre: &str) -> Self {
        Self {
            needle: genre.to_lowercase(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| {
                catalog
                    .movie(candidate.index)
                    .is_some_and(|movie| movie.genre_text().contains(&self.needle))
            })
            .collect()
    }
}
