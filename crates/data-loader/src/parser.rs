//! Parser for MovieLens CSV files and title/genre normalization.
//!
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Readers are generic over `io::Read` so tests (and any other caller) can
//! feed in-memory data; `read_*` wrap them for files on disk.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decode every record of a headed CSV stream.
fn parse_csv<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<T>().enumerate() {
        let record = result.map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            // Header is line 1
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2),
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(File::open(path)?)
}

/// Parse movie records from a headed CSV stream
pub fn parse_movies<R: Read>(reader: R) -> Result<Vec<MovieRecord>> {
    parse_csv(reader, "movies.csv")
}

/// Parse rating records from a headed CSV stream
pub fn parse_ratings<R: Read>(reader: R) -> Result<Vec<RatingRecord>> {
    parse_csv(reader, "ratings.csv")
}

/// Parse the movies.csv file
pub fn read_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    parse_movies(open(path)?)
}

/// Parse the ratings.csv file
pub fn read_ratings(path: &Path) -> Result<Vec<RatingRecord>> {
    parse_ratings(open(path)?)
}

/// Extract year from movie title
///
/// The first parenthesized four-digit group wins.
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Babylon 5" -> None
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    let bytes = title.as_bytes();
    bytes.windows(6).find_map(|w| {
        let digits = &w[1..5];
        if w[0] == b'(' && w[5] == b')' && digits.iter().all(u8::is_ascii_digit) {
            std::str::from_utf8(digits).ok()?.parse().ok()
        } else {
            None
        }
    })
}

/// Split a pipe-delimited genre string into lowercase labels
///
/// Example: "Action|Adventure|Sci-Fi" -> ["action", "adventure", "sci-fi"]
pub fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect()
}

/// Title without its trailing year, e.g. "Toy Story (1995)" -> "Toy Story"
pub fn display_title(title: &str) -> &str {
    match title.find(" (") {
        Some(pos) => &title[..pos],
        None => title,
    }
}
