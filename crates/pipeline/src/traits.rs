//! Core traits for the filtering pipeline.

use data_loader::Catalog;
use similarity::Candidate;

/// Core trait for filtering candidates.
///
/// Filters take ownership of the candidates and return the survivors in
/// their original order. Predicates only read the catalog, so filtering
/// cannot fail.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Vec<Candidate>;
}
