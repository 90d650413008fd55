//! How the search term and the population threshold combine.
//!
//! Under [`FilterPolicy::Override`] the two controls are independent: a
//! debounced search recomputes the visible rows from the term alone, and a
//! population change recomputes them from the threshold alone. Whichever ran
//! last wins. [`FilterPolicy::Composable`] always applies both. The choice is
//! exposed through the `composable_filters` configuration key.

use super::engine::FilterCriteria;
use super::population::PopulationBucket;

/// Which control caused a re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTrigger {
    /// The debounced search fired.
    Search,
    /// The population select changed.
    Population,
}

/// Combination rule for the two filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// The most recent trigger alone determines the visible rows.
    ///
    /// Not composable: changing the population filter does not re-apply an
    /// already typed search term, and vice versa.
    #[default]
    Override,

    /// Every evaluation applies both the applied term and the threshold.
    Composable,
}

impl FilterPolicy {
    #[must_use]
    pub const fn from_flag(composable: bool) -> Self {
        if composable {
            Self::Composable
        } else {
            Self::Override
        }
    }

    #[must_use]
    pub const fn is_composable(self) -> bool {
        matches!(self, Self::Composable)
    }

    /// Builds the criteria for an evaluation caused by `trigger`.
    ///
    /// # Examples
    ///
    /// ```
    /// use country_browser::filter::{FilterPolicy, FilterTrigger, PopulationBucket};
    ///
    /// let bucket = Some(PopulationBucket::Under5M);
    ///
    /// let last_wins = FilterPolicy::Override.criteria(FilterTrigger::Population, "al", bucket);
    /// assert_eq!((last_wins.term, last_wins.threshold), ("", Some(5_000_000)));
    ///
    /// let both = FilterPolicy::Composable.criteria(FilterTrigger::Population, "al", bucket);
    /// assert_eq!((both.term, both.threshold), ("al", Some(5_000_000)));
    /// ```
    #[must_use]
    pub fn criteria<'a>(
        self,
        trigger: FilterTrigger,
        applied_term: &'a str,
        population: Option<PopulationBucket>,
    ) -> FilterCriteria<'a> {
        let threshold = population.map(PopulationBucket::threshold);
        match (self, trigger) {
            (Self::Composable, _) => FilterCriteria::new(applied_term, threshold),
            (Self::Override, FilterTrigger::Search) => FilterCriteria::new(applied_term, None),
            (Self::Override, FilterTrigger::Population) => FilterCriteria::new("", threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_search_ignores_population() {
        let c = FilterPolicy::Override.criteria(
            FilterTrigger::Search,
            "alb",
            Some(PopulationBucket::Under1M),
        );
        assert_eq!(c, FilterCriteria::new("alb", None));
    }

    #[test]
    fn composable_search_keeps_population() {
        let c = FilterPolicy::Composable.criteria(
            FilterTrigger::Search,
            "alb",
            Some(PopulationBucket::Under1M),
        );
        assert_eq!(c, FilterCriteria::new("alb", Some(1_000_000)));
    }

    #[test]
    fn flag_selects_policy() {
        assert_eq!(FilterPolicy::from_flag(false), FilterPolicy::Override);
        assert!(FilterPolicy::from_flag(true).is_composable());
        assert_eq!(FilterPolicy::default(), FilterPolicy::Override);
    }
}
