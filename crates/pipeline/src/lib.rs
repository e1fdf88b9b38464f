//! Filter pipeline for ranked recommendation candidates.
//!
//! This crate provides:
//! - Filter trait and one implementation per caller-supplied predicate
//! - FilterPipeline for composing filters and truncating the result
//! - FilterCriteria, the optional predicates of a recommendation query
//!
//! Filters never reorder: the scorer's ranking survives the pipeline.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterCriteria, FilterPipeline};
//!
//! let criteria = FilterCriteria::default().with_genre("comedy").with_min_rating(3.5);
//! let pipeline = FilterPipeline::from_criteria(&criteria);
//! let top = pipeline.apply_and_truncate(candidates, &catalog, 10);
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::{FilterCriteria, FilterPipeline};
