//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! overrides:
//!
//! ```json
//! { "top_users": 300, "precompute_content": true }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use similarity::{BlendWeights, CollaborativeConfig, DEFAULT_MATCH_THRESHOLD};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Most active users kept in the reduced rating matrix
    pub top_users: usize,
    /// Most rated movies kept in the reduced rating matrix
    pub top_movies: usize,
    /// Latent dimensions (clamped to the reduced matrix size)
    pub latent_factors: usize,
    /// Materialize the full content similarity matrix at build time
    pub precompute_content: bool,
    pub content_weight: f32,
    pub collaborative_weight: f32,
    /// Minimum fuzzy-match confidence, 0-100
    pub match_threshold: u8,
    /// Result count when a query doesn't specify one
    pub default_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let collaborative = CollaborativeConfig::default();
        let weights = BlendWeights::default();
        Self {
            top_users: collaborative.top_users,
            top_movies: collaborative.top_movies,
            latent_factors: collaborative.latent_factors,
            precompute_content: false,
            content_weight: weights.content,
            collaborative_weight: weights.collaborative,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            default_limit: 10,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn with_top_users(mut self, top_users: usize) -> Self {
        self.top_users = top_users;
        self
    }

    pub fn with_top_movies(mut self, top_movies: usize) -> Self {
        self.top_movies = top_movies;
        self
    }

    pub fn with_latent_factors(mut self, latent_factors: usize) -> Self {
        self.latent_factors = latent_factors;
        self
    }

    pub fn with_precompute_content(mut self, precompute: bool) -> Self {
        self.precompute_content = precompute;
        self
    }

    pub fn with_weights(mut self, content: f32, collaborative: f32) -> Self {
        self.content_weight = content;
        self.collaborative_weight = collaborative;
        self
    }

    pub fn with_match_threshold(mut self, threshold: u8) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn collaborative(&self) -> CollaborativeConfig {
        CollaborativeConfig {
            top_users: self.top_users,
            top_movies: self.top_movies,
            latent_factors: self.latent_factors,
        }
    }

    pub fn weights(&self) -> BlendWeights {
        BlendWeights {
            content: self.content_weight,
            collaborative: self.collaborative_weight,
        }
    }
}
