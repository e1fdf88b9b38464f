//! # Recommendation Orchestrator
//!
//! `RecommendationEngine` is built once from a catalog and then only read:
//! 1. Build the content and collaborative models (in parallel)
//! 2. Index titles for fuzzy resolution
//!
//! Each query then runs:
//! 1. Resolve the title (below the confidence threshold -> empty result)
//! 2. Rank every other movie with the hybrid scorer
//! 3. Apply the caller's filters, keep the first N
//!
//! No query path fails. "No confident match" and "filters removed
//! everything" both come back as an empty list; `recommend_detailed`
//! tells them apart through `matched`.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use data_loader::{Catalog, MovieId};
use pipeline::{FilterCriteria, FilterPipeline};
use similarity::{CollaborativeModel, ContentModel, HybridScorer, TitleMatch, TitleResolver};

use crate::config::EngineConfig;

/// A recommendation query: a title plus optional filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    /// Result count; the engine's default when absent
    pub limit: Option<usize>,
}

impl RecommendQuery {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.criteria = self.criteria.with_genre(genre);
        self
    }

    pub fn with_min_rating(mut self, min_rating: f32) -> Self {
        self.criteria = self.criteria.with_min_rating(min_rating);
        self
    }

    pub fn with_year_min(mut self, year: u16) -> Self {
        self.criteria = self.criteria.with_year_min(year);
        self
    }

    pub fn with_year_max(mut self, year: u16) -> Self {
        self.criteria = self.criteria.with_year_max(year);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One recommended movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    pub genres: Vec<String>,
    /// Blended similarity to the query movie
    pub score: f32,
}

/// Recommendations together with the title the query resolved to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// `None` when no title reached the confidence threshold
    pub matched: Option<TitleMatch>,
    pub recommendations: Vec<MovieRecommendation>,
}

impl RecommendationResult {
    pub fn titles(&self) -> Vec<String> {
        self.recommendations.iter().map(|r| r.title.clone()).collect()
    }
}

/// The immutable hybrid recommendation engine
pub struct RecommendationEngine {
    catalog: Catalog,
    content: ContentModel,
    collaborative: CollaborativeModel,
    resolver: TitleResolver,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Build every model over `catalog`
    pub fn build(catalog: Catalog, config: EngineConfig) -> Result<Self> {
        let start_time = Instant::now();
        let collaborative_config = config.collaborative();

        // The two models only read the catalog
        let (content, collaborative) = rayon::join(
            || ContentModel::build(&catalog, config.precompute_content),
            || CollaborativeModel::build(catalog.ratings(), &collaborative_config),
        );
        let collaborative = collaborative.context("Failed to build collaborative model")?;

        let resolver = TitleResolver::new(&catalog).with_threshold(config.match_threshold);

        info!(
            "Recommendation engine ready: {} movies, {} in collaborative index, built in {:.2?}",
            catalog.len(),
            collaborative.movie_ids().len(),
            start_time.elapsed()
        );

        Ok(Self {
            catalog,
            content,
            collaborative,
            resolver,
            config,
        })
    }

    /// Load `movies.csv` and `ratings.csv` from `data_dir`, then build
    pub fn load_from_dir(data_dir: &Path, config: EngineConfig) -> Result<Self> {
        let catalog = Catalog::load_from_files(data_dir)
            .with_context(|| format!("Failed to load catalog from {}", data_dir.display()))?;
        Self::build(catalog, config)
    }

    /// Ranked, filtered titles similar to `query.title`
    pub fn recommend(&self, query: &RecommendQuery) -> Vec<String> {
        self.recommend_detailed(query).titles()
    }

    /// Same as `recommend`, keeping the resolved title and per-movie details
    #[instrument(skip(self, query), fields(title = %query.title))]
    pub fn recommend_detailed(&self, query: &RecommendQuery) -> RecommendationResult {
        let start_time = Instant::now();

        let Some(matched) = self.resolver.resolve(&query.title) else {
            info!("No confident match for {:?}", query.title);
            return RecommendationResult::default();
        };
        debug!("Resolved to {:?} (score {})", matched.title, matched.score);

        let ranked = HybridScorer::new(&self.catalog, &self.content, &self.collaborative)
            .with_weights(self.config.weights())
            .rank(matched.index);

        let limit = query.limit.unwrap_or(self.config.default_limit);
        let selected = FilterPipeline::from_criteria(&query.criteria).apply_and_truncate(
            ranked,
            &self.catalog,
            limit,
        );

        let recommendations: Vec<MovieRecommendation> = selected
            .into_iter()
            .filter_map(|candidate| {
                let movie = self.catalog.movie(candidate.index)?;
                Some(MovieRecommendation {
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    year: movie.year,
                    genres: movie.genres.clone(),
                    score: candidate.score,
                })
            })
            .collect();

        info!(
            "Returning {} recommendations for {:?} in {:.2?}",
            recommendations.len(),
            matched.title,
            start_time.elapsed()
        );

        RecommendationResult {
            matched: Some(matched),
            recommendations,
        }
    }

    /// The catalog title a free-text query resolves to, if confident enough
    pub fn resolve(&self, title: &str) -> Option<TitleMatch> {
        self.resolver.resolve(title)
    }

    /// One title chosen uniformly at random from the catalog
    pub fn random_title(&self) -> Option<&str> {
        self.catalog.random_title()
    }

    pub fn random_title_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.catalog.random_title_with(rng)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn content_model(&self) -> &ContentModel {
        &self.content
    }

    pub fn collaborative_model(&self) -> &CollaborativeModel {
        &self.collaborative
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
