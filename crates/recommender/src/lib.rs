//! Recommender crate for the hybrid movie recommendation engine.
//!
//! This crate contains the orchestrator that wires the catalog, the two
//! similarity models, the title resolver and the filter pipeline into one
//! immutable `RecommendationEngine`, plus its configuration.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{EngineConfig, RecommendQuery, RecommendationEngine};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(RecommendationEngine::load_from_dir(
//!     Path::new("data/ml-latest-small"),
//!     EngineConfig::default(),
//! )?);
//!
//! let titles = engine.recommend(
//!     &RecommendQuery::new("toy story").with_min_rating(3.5).with_year_min(1990),
//! );
//! ```

pub mod config;
pub mod orchestrator;

pub use config::EngineConfig;
pub use orchestrator::{
    MovieRecommendation, RecommendQuery, RecommendationEngine, RecommendationResult,
};
