//! Candidate and score types shared by the scorer and the filter pipeline.

use data_loader::MovieId;
use serde::{Deserialize, Serialize};

/// Weights for blending the two similarity signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub content: f32,
    pub collaborative: f32,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            content: 0.4,
            collaborative: 0.6,
        }
    }
}

/// What the scorer knew about a candidate.
///
/// Movies outside the reduced rating matrix only have a genre signal.
/// There is no collaborative-only variant: every catalog movie has a
/// content row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimilaritySignal {
    Blended { content: f32, collaborative: f32 },
    ContentOnly { content: f32 },
}

impl SimilaritySignal {
    pub fn content(&self) -> f32 {
        match *self {
            SimilaritySignal::Blended { content, .. } => content,
            SimilaritySignal::ContentOnly { content } => content,
        }
    }

    pub fn collaborative(&self) -> Option<f32> {
        match *self {
            SimilaritySignal::Blended { collaborative, .. } => Some(collaborative),
            SimilaritySignal::ContentOnly { .. } => None,
        }
    }

    /// Final score under the given weights
    pub fn blend(&self, weights: &BlendWeights) -> f32 {
        match *self {
            SimilaritySignal::Blended {
                content,
                collaborative,
            } => weights.content * content + weights.collaborative * collaborative,
            SimilaritySignal::ContentOnly { content } => content,
        }
    }
}

/// A movie the scorer proposes for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position in catalog order
    pub index: usize,
    pub movie_id: MovieId,
    pub signal: SimilaritySignal,
    /// `signal` blended under the scorer's weights
    pub score: f32,
}

impl Candidate {
    pub fn new(index: usize, movie_id: MovieId, signal: SimilaritySignal, weights: &BlendWeights) -> Self {
        Self {
            index,
            movie_id,
            signal,
            score: signal.blend(weights),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_weights() {
        let weights = BlendWeights::default();
        let signal = SimilaritySignal::Blended {
            content: 0.5,
            collaborative: 1.0,
        };
        assert!((signal.blend(&weights) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_content_only_ignores_weights() {
        let weights = BlendWeights {
            content: 0.1,
            collaborative: 0.9,
        };
        let signal = SimilaritySignal::ContentOnly { content: 0.7 };

        assert_eq!(signal.blend(&weights), 0.7);
        assert_eq!(signal.collaborative(), None);
    }

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(
            3,
            42,
            SimilaritySignal::ContentOnly { content: 0.25 },
            &BlendWeights::default(),
        );
        assert_eq!(candidate.movie_id, 42);
        assert_eq!(candidate.index, 3);
        assert_eq!(candidate.score, 0.25);
    }
}
