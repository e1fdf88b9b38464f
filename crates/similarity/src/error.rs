//! Error types for model construction.

use thiserror::Error;

/// Failures while building a similarity model
#[derive(Error, Debug)]
pub enum ModelError {
    /// The singular value decomposition did not converge
    #[error("SVD did not converge on a {rows}x{cols} matrix")]
    NoConvergence { rows: usize, cols: usize },

    /// The decomposition came back without V^T
    #[error("SVD failed to compute V^T")]
    MissingRightSingularVectors,
}

pub type Result<T> = std::result::Result<T, ModelError>;
