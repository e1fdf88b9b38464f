//! The FilterPipeline orchestrates multiple filters.
//!
//! Filters are chained with the builder pattern, or assembled from a
//! `FilterCriteria` where each present field contributes one filter.

use crate::filters::{GenreFilter, MinimumRatingFilter, YearRangeFilter};
use crate::traits::Filter;
use data_loader::Catalog;
use serde::{Deserialize, Serialize};
use similarity::Candidate;

/// Optional predicates of a recommendation query.
///
/// An absent field applies no filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub genre: Option<String>,
    pub min_rating: Option<f32>,
    pub year_min: Option<u16>,
    pub year_max: Option<u16>,
}

impl FilterCriteria {
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_min_rating(mut self, min_rating: f32) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_year_min(mut self, year: u16) -> Self {
        self.year_min = Some(year);
        self
    }

    pub fn with_year_max(mut self, year: u16) -> Self {
        self.year_max = Some(year);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.genre.is_none()
            && self.min_rating.is_none()
            && self.year_min.is_none()
            && self.year_max.is_none()
    }
}

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(GenreFilter::new("comedy"))
///     .add_filter(MinimumRatingFilter::new(3.5));
///
/// let filtered = pipeline.apply(candidates, &catalog);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// One filter per present criterion: genre, minimum rating, year range
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let mut pipeline = Self::new();
        if let Some(genre) = &criteria.genre {
            pipeline = pipeline.add_filter(GenreFilter::new(genre));
        }
        if let Some(min_rating) = criteria.min_rating {
            pipeline = pipeline.add_filter(MinimumRatingFilter::new(min_rating));
        }
        if criteria.year_min.is_some() || criteria.year_max.is_some() {
            pipeline = pipeline.add_filter(YearRangeFilter::new(criteria.year_min, criteria.year_max));
        }
        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    pub fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Vec<Candidate> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, catalog);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }

    /// Apply all filters, then keep the first `limit` survivors
    pub fn apply_and_truncate(
        &self,
        candidates: Vec<Candidate>,
        catalog: &Catalog,
        limit: usize,
    ) -> Vec<Candidate> {
        let mut filtered = self.apply(candidates, catalog);
        filtered.truncate(limit);
        filtered
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
