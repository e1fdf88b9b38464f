//! Filter on release year.

use crate::traits::Filter;
use data_loader::Catalog;
use similarity::Candidate;

/// Keeps candidates released within the inclusive bounds.
///
/// With no bounds every candidate passes. With any bound, a movie whose
/// year is unknown is removed.
pub struct YearRangeFilter {
    year_min: Option<u16>,
    year_max: Option<u16>,
}

impl YearRangeFilter {
    pub fn new(year_min: Option<u16>, year_max: Option<u16>) -> Self {
        Self { year_min, year_max }
    }

    fn accepts(&self, year: Option<u16>) -> bool {
        if self.year_min.is_none() && self.year_max.is_none() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.year_min.is_none_or(|min| year >= min) && self.year_max.is_none_or(|max| year <= max)
    }
}

impl Filter for YearRangeFilter {
    fn name(&self) -> &str {
        "YearRangeFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| {
                catalog
                    .movie(candidate.index)
                    .is_some_and(|movie| self.accepts(movie.year))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::*;

    #[test]
    fn test_year_min_only_removes_older_and_undated() {
        let catalog = create_test_catalog();
        let filtered = YearRangeFilter::new(Some(2000), None).apply(all_candidates(&catalog), &catalog);

        // 2000 itself is kept
        assert_eq!(ids(&filtered), vec![2, 3]);
    }

    #[test]
    fn test_year_max_only() {
        let catalog = create_test_catalog();
        let filtered = YearRangeFilter::new(None, Some(2000)).apply(all_candidates(&catalog), &catalog);

        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn test_year_range() {
        let catalog = create_test_catalog();
        let filtered =
            YearRangeFilter::new(Some(1990), Some(2010)).apply(all_candidates(&catalog), &catalog);

        assert_eq!(ids(&filtered), vec![2]);
    }

    #[test]
    fn test_no_bounds_keeps_undated() {
        let catalog = create_test_catalog();
        let filtered = YearRangeFilter::new(None, None).apply(all_candidates(&catalog), &catalog);

        assert_eq!(filtered.len(), 4);
    }
}
