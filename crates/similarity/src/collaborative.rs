//! Collaborative Similarity Model
//!
//! Item-item similarity from co-rating patterns, bounded to the most active
//! users and the most rated movies.
//!
//! ## Algorithm
//! 1. Keep the top-N users and top-M movies by rating count (ties go to
//!    whichever appeared first in the input)
//! 2. Pivot the surviving ratings into a dense users x movies matrix,
//!    rows and columns in ascending id order, missing cells = 0
//! 3. Subtract each row's mean over the dense row (zeros included)
//! 4. SVD; the right singular vectors of the k largest singular values
//!    are the movie factors (k clamped to the matrix dimensions)
//! 5. All-pairs cosine over the factors, cached for the model's lifetime
//!
//! Step 3 centers after zero-filling: the row mean includes the filled
//! zeros, and the filled cells become `-mean`.

use crate::error::{ModelError, Result};
use data_loader::{MovieId, Rating, UserId};
use nalgebra::{DMatrix, SVD};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, info, instrument, warn};

/// Iteration cap for the SVD solver
const SVD_MAX_ITERATIONS: usize = 10_000;

/// Size limits for the reduced rating matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborativeConfig {
    pub top_users: usize,
    pub top_movies: usize,
    pub latent_factors: usize,
}

impl Default for CollaborativeConfig {
    fn default() -> Self {
        Self {
            top_users: 200,
            top_movies: 500,
            latent_factors: 20,
        }
    }
}

/// Movie-by-movie cosine similarity in latent factor space
#[derive(Debug, Default)]
pub struct CollaborativeModel {
    /// Movie id -> column of the reduced matrix
    column_index: HashMap<MovieId, usize>,
    /// Column -> movie id, ascending
    movie_ids: Vec<MovieId>,
    users: usize,
    latent_factors: usize,
    /// Row-major movies x movies
    similarity: Vec<f32>,
}

impl CollaborativeModel {
    /// Model with no movies; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    #[instrument(skip(ratings), fields(ratings = ratings.len()))]
    pub fn build(ratings: &[Rating], config: &CollaborativeConfig) -> Result<Self> {
        let top_users: HashSet<UserId> =
            top_by_count(ratings.iter().map(|r| r.user_id), config.top_users);
        let top_movies: HashSet<MovieId> =
            top_by_count(ratings.iter().map(|r| r.movie_id), config.top_movies);

        // (user, movie) -> (sum, count); duplicates are averaged
        let mut cells: BTreeMap<(UserId, MovieId), (f64, u32)> = BTreeMap::new();
        for rating in ratings {
            if top_users.contains(&rating.user_id) && top_movies.contains(&rating.movie_id) {
                let cell = cells.entry((rating.user_id, rating.movie_id)).or_insert((0.0, 0));
                cell.0 += rating.rating as f64;
                cell.1 += 1;
            }
        }

        // Only users and movies that survive the restriction become rows/columns
        let mut user_ids: Vec<UserId> = cells.keys().map(|&(u, _)| u).collect();
        user_ids.dedup();
        let mut movie_ids: Vec<MovieId> = cells.keys().map(|&(_, m)| m).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();

        if user_ids.is_empty() || movie_ids.is_empty() {
            warn!("Reduced rating matrix is empty; collaborative signal disabled");
            return Ok(Self::empty());
        }

        let row_index: HashMap<UserId, usize> =
            user_ids.iter().enumerate().map(|(i, &u)| (u, i)).collect();
        let column_index: HashMap<MovieId, usize> =
            movie_ids.iter().enumerate().map(|(i, &m)| (m, i)).collect();

        let (rows, cols) = (user_ids.len(), movie_ids.len());
        let mut matrix = DMatrix::<f64>::zeros(rows, cols);
        for (&(user, movie), &(sum, count)) in &cells {
            matrix[(row_index[&user], column_index[&movie])] = sum / count as f64;
        }
        center_rows(&mut matrix);
        debug!("Centered {}x{} rating matrix", rows, cols);

        let max_rank = rows.min(cols);
        let k = config.latent_factors.min(max_rank);
        if k < config.latent_factors {
            warn!(
                "Clamping latent factors from {} to {} ({}x{} matrix)",
                config.latent_factors, k, rows, cols
            );
        }

        let factors = movie_factors(matrix, k)?;
        let similarity = cosine_matrix(&factors, cols, k);

        info!(
            "Collaborative model built: {} users x {} movies, k={}",
            rows, cols, k
        );

        Ok(Self {
            column_index,
            movie_ids,
            users: rows,
            latent_factors: k,
            similarity,
        })
    }

    /// Column of a movie in the reduced matrix
    pub fn column_of(&self, movie_id: MovieId) -> Option<usize> {
        self.column_index.get(&movie_id).copied()
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.column_index.contains_key(&movie_id)
    }

    /// Similarity between two movies, `None` if either lacks a column
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Option<f32> {
        self.similarity_by_column(self.column_of(a)?, self.column_of(b)?)
    }

    /// Similarity between two columns, `None` if either is out of range
    pub fn similarity_by_column(&self, a: usize, b: usize) -> Option<f32> {
        let n = self.movie_ids.len();
        if a >= n || b >= n {
            return None;
        }
        Some(self.similarity[a * n + b])
    }

    /// Movie ids covered by the reduced matrix, in column order
    pub fn movie_ids(&self) -> &[MovieId] {
        &self.movie_ids
    }

    /// (users, movies) of the reduced matrix
    pub fn dimensions(&self) -> (usize, usize) {
        (self.users, self.movie_ids.len())
    }

    /// Effective k after clamping
    pub fn latent_factors(&self) -> usize {
        self.latent_factors
    }

    pub fn is_empty(&self) -> bool {
        self.movie_ids.is_empty()
    }
}

/// The `limit` most frequent keys. Equal counts keep first-appearance order.
fn top_by_count<K, I>(keys: I, limit: usize) -> HashSet<K>
where
    K: Copy + Eq + Hash,
    I: Iterator<Item = K>,
{
    let mut position: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match position.get(&key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                position.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    // Stable sort keeps input order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(key, _)| key).collect()
}

/// Subtract each row's mean, computed over every cell of the row
fn center_rows(matrix: &mut DMatrix<f64>) {
    let cols = matrix.ncols() as f64;
    for mut row in matrix.row_iter_mut() {
        let mean = row.sum() / cols;
        for value in row.iter_mut() {
            *value -= mean;
        }
    }
}

/// k-dimensional factor per column: the right singular vectors of the k
/// largest singular values. Returned row-major, one row per movie.
fn movie_factors(matrix: DMatrix<f64>, k: usize) -> Result<Vec<f64>> {
    let (rows, cols) = matrix.shape();
    let svd = SVD::try_new(matrix, false, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(ModelError::NoConvergence { rows, cols })?;
    let v_t = svd.v_t.ok_or(ModelError::MissingRightSingularVectors)?;

    // Components by descending singular value; index breaks ties
    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| {
        svd.singular_values[b]
            .partial_cmp(&svd.singular_values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut factors = vec![0.0; cols * k];
    for movie in 0..cols {
        for (c, &component) in order.iter().take(k).enumerate() {
            factors[movie * k + c] = v_t[(component, movie)];
        }
    }
    Ok(factors)
}

/// All-pairs cosine similarity of row-major factor vectors.
///
/// Zero-norm vectors score 0 against everything. The dot product runs over
/// components in the same order for (a, b) and (b, a), so the result is
/// exactly symmetric.
fn cosine_matrix(factors: &[f64], n: usize, k: usize) -> Vec<f32> {
    if k == 0 {
        return vec![0.0; n * n];
    }
    let vector = |i: usize| &factors[i * k..(i + 1) * k];
    let norms: Vec<f64> = (0..n)
        .map(|i| vector(i).iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();

    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = vector(i);
            let norms = &norms;
            (0..n).map(move |j| {
                let denom = norms[i] * norms[j];
                if denom == 0.0 {
                    return 0.0;
                }
                let b = vector(j);
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                (dot / denom).clamp(-1.0, 1.0) as f32
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: UserId, movie_id: MovieId, rating: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating,
        }
    }

    fn create_test_ratings() -> Vec<Rating> {
        let mut ratings = Vec::new();
        // Users 1-4 love movies 10 and 11, dislike 12
        for user in 1..=4 {
            ratings.push(rating(user, 10, 5.0));
            ratings.push(rating(user, 11, 4.5));
            ratings.push(rating(user, 12, 1.0));
        }
        // Users 5-6 prefer 12 and 13
        for user in 5..=6 {
            ratings.push(rating(user, 12, 5.0));
            ratings.push(rating(user, 13, 4.0));
            ratings.push(rating(user, 10, 1.0));
        }
        // One stray rating from a low-activity user
        ratings.push(rating(99, 14, 3.0));
        ratings
    }

    #[test]
    fn test_top_by_count_ties_keep_input_order() {
        let top = top_by_count([3u32, 1, 2, 2, 1, 3, 4].into_iter(), 2);
        // 3, 1 and 2 all appear twice; 3 and 1 were seen first
        assert!(top.contains(&3));
        assert!(top.contains(&1));
        assert!(!top.contains(&2));
    }

    #[test]
    fn test_center_rows_uses_dense_mean() {
        let mut matrix = DMatrix::from_row_slice(1, 4, &[4.0, 0.0, 2.0, 0.0]);
        center_rows(&mut matrix);
        // Mean over all four cells is 1.5
        assert_eq!(matrix[(0, 0)], 2.5);
        assert_eq!(matrix[(0, 1)], -1.5);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let config = CollaborativeConfig {
            top_users: 10,
            top_movies: 10,
            latent_factors: 3,
        };
        let model = CollaborativeModel::build(&create_test_ratings(), &config).unwrap();

        for &a in model.movie_ids() {
            for &b in model.movie_ids() {
                assert_eq!(model.similarity(a, b), model.similarity(b, a));
                let s = model.similarity(a, b).unwrap();
                assert!((-1.0..=1.0).contains(&s));
            }
        }
    }

    #[test]
    fn test_restricts_to_top_movies() {
        let config = CollaborativeConfig {
            top_users: 6,
            top_movies: 3,
            latent_factors: 20,
        };
        let model = CollaborativeModel::build(&create_test_ratings(), &config).unwrap();

        assert_eq!(model.movie_ids(), &[10, 11, 12]);
        assert!(!model.contains(13));
        assert!(!model.contains(14));
        assert_eq!(model.similarity(10, 14), None);
    }

    #[test]
    fn test_latent_factors_clamped() {
        let config = CollaborativeConfig {
            top_users: 2,
            top_movies: 10,
            latent_factors: 20,
        };
        let model = CollaborativeModel::build(&create_test_ratings(), &config).unwrap();

        let (users, movies) = model.dimensions();
        assert_eq!(users, 2);
        assert!(movies <= 4);
        assert_eq!(model.latent_factors(), users.min(movies));
    }

    #[test]
    fn test_co_rated_movies_are_similar() {
        let config = CollaborativeConfig {
            top_users: 10,
            top_movies: 10,
            latent_factors: 2,
        };
        let model = CollaborativeModel::build(&create_test_ratings(), &config).unwrap();

        let close = model.similarity(10, 11).unwrap();
        let far = model.similarity(10, 13).unwrap();
        assert!(close > far);
    }

    #[test]
    fn test_duplicate_ratings_are_averaged() {
        let config = CollaborativeConfig {
            top_users: 10,
            top_movies: 10,
            latent_factors: 3,
        };
        let with_rating = |values: &[f32]| {
            let mut ratings: Vec<Rating> = create_test_ratings()
                .into_iter()
                .filter(|r| !(r.user_id == 1 && r.movie_id == 11))
                .collect();
            ratings.extend(values.iter().map(|&v| rating(1, 11, v)));
            ratings
        };

        let twice = CollaborativeModel::build(&with_rating(&[2.0, 4.0]), &config).unwrap();
        let once = CollaborativeModel::build(&with_rating(&[3.0]), &config).unwrap();

        assert_eq!(twice.movie_ids(), once.movie_ids());
        assert_eq!(twice.dimensions(), once.dimensions());
        for &a in once.movie_ids() {
            for &b in once.movie_ids() {
                let expected = once.similarity(a, b).unwrap();
                let actual = twice.similarity(a, b).unwrap();
                assert!(
                    (expected - actual).abs() < 1e-6,
                    "similarity({}, {}): {} vs {}",
                    a,
                    b,
                    actual,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_cosine_matrix_zero_norm_scores_zero() {
        // Three movies, k = 2; the middle one has an all-zero factor row
        let factors = [1.0, 0.0, 0.0, 0.0, 0.6, 0.8];
        let similarity = cosine_matrix(&factors, 3, 2);

        assert_eq!(similarity.len(), 9);
        assert!((similarity[0] - 1.0).abs() < 1e-6);
        assert!((similarity[2] - 0.6).abs() < 1e-6);
        assert_eq!(similarity[2], similarity[6]);
        for i in 0..3 {
            assert_eq!(similarity[3 + i], 0.0);
            assert_eq!(similarity[i * 3 + 1], 0.0);
        }

        assert_eq!(cosine_matrix(&[], 2, 0), vec![0.0; 4]);
    }

    #[test]
    fn test_similarity_by_column_out_of_range() {
        let config = CollaborativeConfig {
            top_users: 10,
            top_movies: 10,
            latent_factors: 2,
        };
        let model = CollaborativeModel::build(&create_test_ratings(), &config).unwrap();
        let n = model.movie_ids().len();

        assert!(model.similarity_by_column(0, n - 1).is_some());
        assert_eq!(model.similarity_by_column(n, 0), None);
        assert_eq!(model.similarity_by_column(0, n), None);
        assert_eq!(CollaborativeModel::empty().similarity_by_column(0, 0), None);
    }

    #[test]
    fn test_empty_ratings() {
        let model =
            CollaborativeModel::build(&[], &CollaborativeConfig::default()).unwrap();
        assert!(model.is_empty());
        assert_eq!(model.dimensions(), (0, 0));
        assert_eq!(model.similarity(1, 2), None);
    }
}
