//! Hybrid Scorer
//!
//! Ranks every catalog movie against a resolved query movie by blending
//! the content and collaborative signals.
//!
//! ## Algorithm
//! 1. Content row for the query (one score per catalog movie)
//! 2. For each other movie: if both it and the query have a column in the
//!    collaborative model, `Blended`; otherwise `ContentOnly`
//! 3. Stable sort by blended score, descending; ties stay in catalog order

use crate::collaborative::CollaborativeModel;
use crate::content::ContentModel;
use crate::types::{BlendWeights, Candidate, SimilaritySignal};
use data_loader::Catalog;
use tracing::{debug, instrument};

/// Borrowed view over the built models
pub struct HybridScorer<'a> {
    catalog: &'a Catalog,
    content: &'a ContentModel,
    collaborative: &'a CollaborativeModel,
    weights: BlendWeights,
}

impl<'a> HybridScorer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        content: &'a ContentModel,
        collaborative: &'a CollaborativeModel,
    ) -> Self {
        Self {
            catalog,
            content,
            collaborative,
            weights: BlendWeights::default(),
        }
    }

    /// Configure blend weights (default: 0.4 content, 0.6 collaborative)
    pub fn with_weights(mut self, weights: BlendWeights) -> Self {
        self.weights = weights;
        self
    }

    /// All candidates for the movie at `query_index`, best first.
    /// The query movie itself is never a candidate.
    #[instrument(skip(self))]
    pub fn rank(&self, query_index: usize) -> Vec<Candidate> {
        let Some(query) = self.catalog.movie(query_index) else {
            return Vec::new();
        };
        let content_row = self.content.similarity_row(query_index);
        let query_column = self.collaborative.column_of(query.id);

        let mut candidates: Vec<Candidate> = self
            .catalog
            .movies()
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != query_index)
            .map(|(index, movie)| {
                let content = content_row[index];
                let collaborative = query_column
                    .zip(self.collaborative.column_of(movie.id))
                    .and_then(|(a, b)| self.collaborative.similarity_by_column(a, b));
                let signal = match collaborative {
                    Some(collaborative) => SimilaritySignal::Blended {
                        content,
                        collaborative,
                    },
                    None => SimilaritySignal::ContentOnly { content },
                };
                Candidate::new(index, movie.id, signal, &self.weights)
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Ranked {} candidates for {:?} (collaborative column: {:?})",
            candidates.len(),
            query.title,
            query_column
        );
        candidates
    }
}
