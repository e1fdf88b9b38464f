//! Title Resolver
//!
//! Fuzzy-matches a free-text query against catalog titles and returns the
//! single best title with a 0-100 confidence.
//!
//! ## Scoring
//! Both strings are normalized (lowercase, non-alphanumerics become spaces,
//! whitespace collapsed). The score is a weighted ratio:
//! - plain ratio (normalized Levenshtein similarity)
//! - similar lengths (ratio < 1.5): token-sort and token-set ratios, x0.95
//! - otherwise: partial ratios (best window of the longer string), x0.9,
//!   or x0.6 when one string is 8+ times longer; token variants also x0.95
//!
//! The highest of these wins. "toy story" scores 90 against
//! "Toy Story (1995)", well above the default threshold of 60.

use data_loader::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;
use tracing::debug;

/// Confidence below which a query counts as "no match"
pub const DEFAULT_MATCH_THRESHOLD: u8 = 60;

const UNBASE_SCALE: f64 = 0.95;

/// Result of resolving a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatch {
    pub title: String,
    /// Catalog index the title maps to
    pub index: usize,
    /// Confidence, 0-100
    pub score: u8,
}

/// Fuzzy title lookup over a catalog's distinct titles
pub struct TitleResolver {
    /// (title, normalized title, catalog index), first-appearance order
    titles: Vec<(String, String, usize)>,
    threshold: u8,
}

impl TitleResolver {
    pub fn new(catalog: &Catalog) -> Self {
        let titles = catalog
            .titles()
            .iter()
            .filter_map(|title| {
                let index = catalog.index_of_title(title)?;
                Some((title.clone(), normalize(title), index))
            })
            .collect();
        Self {
            titles,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Configure the confidence threshold (default: 60)
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Best match regardless of threshold. Ties keep the earliest title.
    pub fn best_match(&self, query: &str) -> Option<TitleMatch> {
        let query = normalize(query);
        let mut best: Option<(u8, &(String, String, usize))> = None;
        for entry in &self.titles {
            let score = weighted_ratio_normalized(&query, &entry.1);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, entry));
                if score == 100 {
                    break;
                }
            }
        }
        best.map(|(score, (title, _, index))| TitleMatch {
            title: title.clone(),
            index: *index,
            score,
        })
    }

    /// Best match if its confidence reaches the threshold
    pub fn resolve(&self, query: &str) -> Option<TitleMatch> {
        let found = self.best_match(query)?;
        if found.score < self.threshold {
            debug!(
                "Best match for {:?} is {:?} at {}, below threshold {}",
                query, found.title, found.score, self.threshold
            );
            return None;
        }
        Some(found)
    }
}

/// Lowercase, non-alphanumerics to spaces, single-spaced, trimmed
pub fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weighted similarity of two raw strings, 0-100
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    weighted_ratio_normalized(&normalize(a), &normalize(b))
}

fn weighted_ratio_normalized(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(a, b);
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if len_ratio < 1.5 {
        let token_sort = ratio(&sorted_tokens(a), &sorted_tokens(b)) * UNBASE_SCALE;
        let token_set = token_set_ratio(a, b, ratio) * UNBASE_SCALE;
        base.max(token_sort).max(token_set)
    } else {
        let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
        let partial = partial_ratio(a, b) * partial_scale;
        let partial_sort = partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
            * UNBASE_SCALE
            * partial_scale;
        let partial_set = token_set_ratio(a, b, partial_ratio) * UNBASE_SCALE * partial_scale;
        base.max(partial).max(partial_sort).max(partial_set)
    };
    best.round().clamp(0.0, 100.0) as u8
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// Best ratio of the shorter string against every same-length window of
/// the longer one
fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let long: Vec<char> = long.chars().collect();
    let width = short.chars().count();

    let mut best: f64 = 0.0;
    for start in 0..=long.len() - width {
        let window: String = long[start..start + width].iter().collect();
        best = best.max(ratio(short, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Compare the shared tokens against each side's shared-plus-remaining
/// tokens, keeping the best pairing
fn token_set_ratio(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&str>| set.join(" ");
    let intersection = join(tokens_a.intersection(&tokens_b).copied().collect());
    let diff_ab = join(tokens_a.difference(&tokens_b).copied().collect());
    let diff_ba = join(tokens_b.difference(&tokens_a).copied().collect());

    let combine = |diff: &str| format!("{} {}", intersection, diff).trim().to_string();
    let combined_ab = combine(&diff_ab);
    let combined_ba = combine(&diff_ba);

    scorer(&intersection, &combined_ab)
        .max(scorer(&intersection, &combined_ba))
        .max(scorer(&combined_ab, &combined_ba))
}
