//! Filter to ensure a minimum average rating.

use crate::traits::Filter;
use data_loader::Catalog;
use similarity::Candidate;

/// Removes candidates rated below the threshold, and unrated ones.
pub struct MinimumRatingFilter {
    min_rating: f32,
}

impl MinimumRatingFilter {
    pub fn new(min_rating: f32) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| {
                catalog
                    .movie(candidate.index)
                    .and_then(|movie| movie.avg_rating)
                    .is_some_and(|avg| avg >= self.min_rating)
            })
            .collect()
    }
}
