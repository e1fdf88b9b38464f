//! # Similarity Crate
//!
//! The two similarity models behind the hybrid recommender, plus fuzzy
//! title resolution and the scorer that blends them.
//!
//! ## Components
//!
//! ### Content Model
//! TF-IDF over genre tokens; cosine similarity of one movie against the
//! whole catalog, optionally precomputed for every pair.
//!
//! ### Collaborative Model
//! Truncated SVD of a mean-centered rating matrix restricted to the most
//! active users and most rated movies; cosine similarity between the
//! latent movie factors.
//!
//! ### Title Resolver
//! Weighted fuzzy ratio between a query and every catalog title.
//!
//! ### Hybrid Scorer
//! `0.4 * content + 0.6 * collaborative` when both signals exist,
//! content alone otherwise.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{CollaborativeConfig, CollaborativeModel, ContentModel, HybridScorer, TitleResolver};
//!
//! let content = ContentModel::build(&catalog, false);
//! let collaborative = CollaborativeModel::build(catalog.ratings(), &CollaborativeConfig::default())?;
//! let found = TitleResolver::new(&catalog).resolve("toy story").unwrap();
//! let ranked = HybridScorer::new(&catalog, &content, &collaborative).rank(found.index);
//! ```

pub mod error;
pub mod types;
pub mod content;
pub mod collaborative;
pub mod resolver;
pub mod hybrid;

// Re-export commonly used types
pub use error::ModelError;
pub use types::{BlendWeights, Candidate, SimilaritySignal};
pub use content::ContentModel;
pub use collaborative::{CollaborativeConfig, CollaborativeModel};
pub use resolver::{DEFAULT_MATCH_THRESHOLD, TitleMatch, TitleResolver};
pub use hybrid::HybridScorer;
