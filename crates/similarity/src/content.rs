//! Content Similarity Model
//!
//! TF-IDF over genre tokens, cosine similarity between movies.
//!
//! ## Algorithm
//! 1. Tokenize each movie's genre text (lowercase, word runs of 2+ chars,
//!    English stop words removed)
//! 2. Weight = raw term count * smoothed idf `ln((1+n)/(1+df)) + 1`
//! 3. L2-normalize each row, so cosine similarity is a dot product
//! 4. Answer one row at a time through an inverted index, or from a
//!    precomputed all-pairs matrix when configured
//!
//! A row never scores the movie against itself: `row[i] == 0`.

use data_loader::Catalog;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// English stop words removed before weighting
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Split text into lowercase word tokens of two or more characters,
/// dropping stop words.
///
/// "(no genres listed)" -> ["genres", "listed"]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Sparse vector: (term id, weight), sorted by term id
type SparseRow = Vec<(usize, f32)>;

/// TF-IDF vector space over catalog genres
pub struct ContentModel {
    rows: Vec<SparseRow>,
    /// Term id -> (catalog index, weight)
    postings: Vec<Vec<(usize, f32)>>,
    /// Term -> term id, alphabetical
    vocabulary: BTreeMap<String, usize>,
    /// Row-major n x n matrix when precomputation is enabled
    precomputed: Option<Vec<f32>>,
}

impl ContentModel {
    /// Build the model for every movie in catalog order
    #[instrument(skip(catalog), fields(movies = catalog.len()))]
    pub fn build(catalog: &Catalog, precompute: bool) -> Self {
        let documents: Vec<Vec<String>> = catalog
            .movies()
            .iter()
            .map(|movie| tokenize(&movie.genre_text()))
            .collect();

        // Alphabetical vocabulary, term ids in sorted order
        let mut vocabulary: BTreeMap<String, usize> = documents
            .iter()
            .flatten()
            .map(|term| (term.clone(), 0))
            .collect();
        for (id, slot) in vocabulary.values_mut().enumerate() {
            *slot = id;
        }

        // Document frequency per term
        let mut document_frequency = vec![0usize; vocabulary.len()];
        let term_counts: Vec<HashMap<usize, u32>> = documents
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, u32> = HashMap::new();
                for token in tokens {
                    *counts.entry(vocabulary[token]).or_insert(0) += 1;
                }
                for &term in counts.keys() {
                    document_frequency[term] += 1;
                }
                counts
            })
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseRow> = term_counts
            .into_iter()
            .map(|counts| {
                let mut weighted: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(term, tf)| (term, tf as f64 * idf[term]))
                    .collect();
                weighted.sort_unstable_by_key(|&(term, _)| term);

                let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                weighted
                    .into_iter()
                    .map(|(term, w)| {
                        let w = if norm > 0.0 { w / norm } else { 0.0 };
                        (term, w as f32)
                    })
                    .collect()
            })
            .collect();

        let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); vocabulary.len()];
        for (index, row) in rows.iter().enumerate() {
            for &(term, weight) in row {
                postings[term].push((index, weight));
            }
        }

        let mut model = Self {
            rows,
            postings,
            vocabulary,
            precomputed: None,
        };

        if precompute {
            let n = model.rows.len();
            let matrix: Vec<f32> = (0..n)
                .into_par_iter()
                .flat_map_iter(|i| model.compute_row(i))
                .collect();
            debug!("Precomputed {}x{} content similarity matrix", n, n);
            model.precomputed = Some(matrix);
        }

        info!(
            "Content model built: {} movies, {} terms, precomputed={}",
            model.rows.len(),
            model.vocabulary.len(),
            model.precomputed.is_some()
        );
        model
    }

    /// Cosine similarity of one movie against every movie, catalog order.
    ///
    /// `row[index]` is always 0. An out-of-range index yields all zeros.
    pub fn similarity_row(&self, index: usize) -> Vec<f32> {
        let n = self.rows.len();
        if index >= n {
            return vec![0.0; n];
        }
        match &self.precomputed {
            Some(matrix) => matrix[index * n..(index + 1) * n].to_vec(),
            None => self.compute_row(index),
        }
    }

    /// Similarity between two catalog positions
    pub fn similarity(&self, a: usize, b: usize) -> f32 {
        let n = self.rows.len();
        if a >= n || b >= n || a == b {
            return 0.0;
        }
        match &self.precomputed {
            Some(matrix) => matrix[a * n + b],
            None => dot(&self.rows[a], &self.rows[b]),
        }
    }

    fn compute_row(&self, index: usize) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.rows.len()];
        for &(term, weight) in &self.rows[index] {
            for &(other, other_weight) in &self.postings[term] {
                scores[other] += weight * other_weight;
            }
        }
        scores[index] = 0.0;
        scores
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    pub fn is_precomputed(&self) -> bool {
        self.precomputed.is_some()
    }
}

/// Dot product of two rows sorted by term id
fn dot(a: &SparseRow, b: &SparseRow) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut total = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                total += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    total
}
