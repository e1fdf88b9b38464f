//! Filter implementations for the candidate pipeline.

pub mod genre;
pub mod minimum_rating;
pub mod year_range;

// Re-export for convenience
pub use genre::GenreFilter;
pub use minimum_rating::MinimumRatingFilter;
pub use year_range::YearRangeFilter;

#[cfg(test)]
pub(crate) mod test_support {
    use data_loader::{Catalog, MovieRecord, RatingRecord};
    use similarity::{BlendWeights, Candidate, SimilaritySignal};

    pub fn create_test_catalog() -> Catalog {
        Catalog::from_records(
            vec![
                MovieRecord::new(1, "Old Comedy (1980)", "Comedy"),
                MovieRecord::new(2, "Era Sci-Fi (2000)", "Action|Sci-Fi"),
                MovieRecord::new(3, "Recent Drama (2020)", "Drama|Romance"),
                MovieRecord::new(4, "Undated Comedy", "Comedy|Drama"),
            ],
            vec![
                RatingRecord::new(1, 1, 4.5),
                RatingRecord::new(1, 2, 3.0),
                RatingRecord::new(2, 2, 4.0),
                RatingRecord::new(1, 3, 2.0),
            ],
        )
        .unwrap()
    }

    /// One candidate per catalog movie, in catalog order
    pub fn all_candidates(catalog: &Catalog) -> Vec<Candidate> {
        catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(index, movie)| {
                Candidate::new(
                    index,
                    movie.id,
                    SimilaritySignal::ContentOnly { content: 0.5 },
                    &BlendWeights::default(),
                )
            })
            .collect()
    }

    pub fn ids(candidates: &[Candidate]) -> Vec<u32> {
        candidates.iter().map(|c| c.movie_id).collect()
    }
}
