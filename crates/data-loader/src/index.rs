//! Catalog building and indexing logic.
//!
//! Turns raw records into the immutable `Catalog`:
//! - normalize titles, years and genres
//! - index movies by id and by title
//! - aggregate per-movie average ratings
//! - validate ratings, skipping those for unknown movies

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rand::Rng;
use rand::seq::IndexedRandom;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Lowest and highest rating the source scale allows
pub const MIN_RATING: f32 = 0.5;
pub const MAX_RATING: f32 = 5.0;

impl Catalog {
    /// Load `movies.csv` and `ratings.csv` from a directory
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", data_dir);

        let movies_path = data_dir.join("movies.csv");
        let ratings_path = data_dir.join("ratings.csv");

        // Both files parse independently
        let (movies, ratings) = rayon::join(
            || parser::read_movies(&movies_path),
            || parser::read_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies, {} ratings", movies.len(), ratings.len());

        Self::from_records(movies, ratings)
    }

    /// Build a catalog from in-memory records
    ///
    /// Steps:
    /// 1. Validate rating range; drop ratings for movies not in the catalog
    /// 2. Normalize movies and build the id/title indices
    /// 3. Compute movie statistics
    pub fn from_records(movies: Vec<MovieRecord>, ratings: Vec<RatingRecord>) -> Result<Self> {
        let mut catalog = Catalog::default();

        for record in movies {
            catalog.insert_movie(record)?;
        }

        catalog.ratings.reserve(ratings.len());
        for record in ratings {
            catalog.insert_rating(record)?;
        }

        catalog.compute_movie_stats();

        let (movies, ratings, titles) = catalog.counts();
        info!(
            "Catalog built: {} movies ({} distinct titles), {} ratings",
            movies, titles, ratings
        );
        Ok(catalog)
    }

    fn insert_movie(&mut self, record: MovieRecord) -> Result<()> {
        if self.id_index.contains_key(&record.movie_id) {
            return Err(DataLoadError::InvalidValue {
                field: "movieId".to_string(),
                value: format!("{} (duplicate)", record.movie_id),
            });
        }

        let index = self.movies.len();
        let movie = Movie {
            id: record.movie_id,
            year: parser::extract_year_from_title(&record.title),
            genres: parser::parse_genres(&record.genres),
            title: record.title,
            avg_rating: None,
            rating_count: 0,
        };

        self.id_index.insert(movie.id, index);
        // Last write wins for duplicate titles
        if self.title_index.insert(movie.title.clone(), index).is_none() {
            self.titles.push(movie.title.clone());
        }
        self.movies.push(movie);
        Ok(())
    }

    fn insert_rating(&mut self, record: RatingRecord) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&record.rating) {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: record.rating.to_string(),
            });
        }
        if !self.id_index.contains_key(&record.movie_id) {
            warn!(
                "Skipping rating by user {} for unknown movie {}",
                record.user_id, record.movie_id
            );
            return Ok(());
        }

        self.ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
        });
        Ok(())
    }

    /// Compute average rating and rating count for every rated movie
    fn compute_movie_stats(&mut self) {
        let mut movie_ratings: HashMap<MovieId, Vec<f32>> = HashMap::new();
        for rating in &self.ratings {
            movie_ratings
                .entry(rating.movie_id)
                .or_default()
                .push(rating.rating);
        }

        let stats: Vec<(MovieId, f32, u32)> = movie_ratings
            .par_iter()
            .map(|(&movie_id, values)| {
                let total: f64 = values.iter().map(|&v| v as f64).sum();
                let count = values.len();
                (movie_id, (total / count as f64) as f32, count as u32)
            })
            .collect();

        debug!("Computed rating stats for {} movies", stats.len());

        for (movie_id, avg_rating, rating_count) in stats {
            if let Some(&idx) = self.id_index.get(&movie_id) {
                let movie = &mut self.movies[idx];
                movie.avg_rating = Some(avg_rating);
                movie.rating_count = rating_count;
            }
        }
    }

    /// One title chosen uniformly at random from the full catalog
    pub fn random_title(&self) -> Option<&str> {
        self.random_title_with(&mut rand::rng())
    }

    /// Same as `random_title`, with a caller-supplied RNG
    pub fn random_title_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.movies.choose(rng).map(|m| m.title.as_str())
    }

    /// Movies whose title contains `query`, case-insensitively, in catalog order
    pub fn search_titles(&self, query: &str) -> Vec<&Movie> {
        let needle = query.to_lowercase();
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .collect()
    }
}
