//! Core domain types for the movie catalog.
//!
//! Raw records (`MovieRecord`, `RatingRecord`) are what the CSV files hold.
//! The loader normalizes them into `Movie` and `Rating`, which are immutable
//! once the `Catalog` is built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique, stable identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Raw Records
// =============================================================================

/// One row of `movies.csv`: `movieId,title,genres`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-delimited genre labels, e.g. "Adventure|Animation|Children"
    pub genres: String,
}

impl MovieRecord {
    pub fn new(movie_id: MovieId, title: impl Into<String>, genres: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            genres: genres.into(),
        }
    }
}

/// One row of `ratings.csv`: `userId,movieId,rating,timestamp`
///
/// The timestamp is optional so in-memory callers can omit it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub rating: f32,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RatingRecord {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: None,
        }
    }
}

// =============================================================================
// Normalized Entities
// =============================================================================

/// A movie after normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Title as it appears in the source, year suffix included
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    pub year: Option<u16>,
    /// Lowercase genre labels in source order
    pub genres: Vec<String>,
    /// Mean of all ratings for this movie, `None` when unrated
    pub avg_rating: Option<f32>,
    pub rating_count: u32,
}

impl Movie {
    /// Genres joined by spaces, the text the genre filter and the
    /// content model both work from.
    pub fn genre_text(&self) -> String {
        self.genres.join(" ")
    }
}

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0
    pub rating: f32,
}

// =============================================================================
// Catalog
// =============================================================================

/// The immutable, fully indexed catalog.
///
/// Movies keep their input order; that order is the "catalog index" used by
/// the similarity models and as the final tie-breaker when ranking.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) ratings: Vec<Rating>,

    /// Movie id -> catalog index
    pub(crate) id_index: HashMap<MovieId, usize>,
    /// Title -> catalog index; duplicate titles resolve to the last movie
    pub(crate) title_index: HashMap<String, usize>,
    /// Distinct titles in order of first appearance
    pub(crate) titles: Vec<String>,
}

impl Catalog {
    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Movie at a catalog index
    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.id_index.get(&id).map(|&idx| &self.movies[idx])
    }

    /// Catalog index of a movie ID
    pub fn index_of(&self, id: MovieId) -> Option<usize> {
        self.id_index.get(&id).copied()
    }

    /// Catalog index of an exact title
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Distinct titles, the candidate list for fuzzy matching
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// All ratings in input order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get counts for debugging/validation: (movies, ratings, distinct titles)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.ratings.len(), self.titles.len())
    }
}
