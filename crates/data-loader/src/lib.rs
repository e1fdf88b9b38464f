//! # Data Loader Crate
//!
//! Loads the MovieLens "latest-small" CSV files (or equivalent in-memory
//! records) and builds the immutable `Catalog` the recommendation engine
//! reads from.
//!
//! ## Main Components
//!
//! - **types**: Raw records, normalized entities (Movie, Rating) and the Catalog
//! - **parser**: CSV decoding plus title/genre normalization
//! - **index**: Catalog construction, statistics, random sampling
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(Path::new("data/ml-latest-small"))?;
//! let movie = catalog.get_movie(1).unwrap();
//! println!("{} ({:?}) avg {:?}", movie.title, movie.year, movie.avg_rating);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{MAX_RATING, MIN_RATING};
pub use parser::display_title;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Raw records
    MovieRecord,
    RatingRecord,
    // Core types
    Movie,
    Rating,
    Catalog,
};
