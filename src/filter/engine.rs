//! Pure predicates and the subset computation.
//!
//! Every evaluation runs against the full record set. Nothing here looks at a
//! previously computed subset, so narrowing never compounds.

use crate::domain::Country;

/// Inputs to one filter evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCriteria<'a> {
    /// Name search term; empty matches everything.
    pub term: &'a str,
    /// Exclusive population upper bound; `None` matches everything.
    pub threshold: Option<u64>,
}

impl FilterCriteria<'static> {
    /// Criteria that match every record.
    pub const ALL: Self = Self { term: "", threshold: None };
}

impl<'a> FilterCriteria<'a> {
    #[must_use]
    pub const fn new(term: &'a str, threshold: Option<u64>) -> Self {
        Self { term, threshold }
    }

    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.term.is_empty() && self.threshold.is_none()
    }
}

/// Case-insensitive substring match of `term` against the country name.
///
/// A missing name behaves like an empty string: it only matches the empty term.
#[must_use]
pub fn matches_name(country: &Country, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    country
        .name_or_empty()
        .to_lowercase()
        .contains(&term.to_lowercase())
}

/// Strict `population < threshold`.
///
/// Without a threshold every record passes. With one, a record lacking a
/// population never passes.
#[must_use]
pub fn below_threshold(country: &Country, threshold: Option<u64>) -> bool {
    match threshold {
        None => true,
        Some(limit) => country.population.is_some_and(|p| p < limit),
    }
}

/// Positions of the records matching both predicates, in record order.
#[must_use]
pub fn filter_indices(records: &[Country], criteria: &FilterCriteria<'_>) -> Vec<usize> {
    let _span = tracing::debug_span!(
        "filter_countries",
        total = records.len(),
        term_len = criteria.term.len(),
        threshold = ?criteria.threshold
    )
    .entered();

    if criteria.is_unfiltered() {
        return (0..records.len()).collect();
    }

    // Lowercase the term once instead of per record.
    let needle = criteria.term.to_lowercase();

    let indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, country)| {
            (needle.is_empty() || country.name_or_empty().to_lowercase().contains(&needle))
                && below_threshold(country, criteria.threshold)
        })
        .map(|(i, _)| i)
        .collect();

    tracing::debug!(matched = indices.len(), "filter evaluated");
    indices
}

/// The records matching both predicates, in record order.
///
/// # Examples
///
/// ```
/// use country_browser::filter::{filter, FilterCriteria};
/// use country_browser::Country;
///
/// let records = vec![
///     Country::named("Albania", Some(2_800_000)),
///     Country::named("Algeria", Some(44_000_000)),
/// ];
///
/// let hits = filter(&records, &FilterCriteria::new("al", Some(5_000_000)));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].display_name(), "Albania");
/// ```
#[must_use]
pub fn filter<'r>(records: &'r [Country], criteria: &FilterCriteria<'_>) -> Vec<&'r Country> {
    filter_indices(records, criteria)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Country> {
        vec![
            Country::named("Albania", Some(2_800_000)),
            Country::named("Algeria", Some(44_000_000)),
            Country::named("Andorra", Some(77_000)),
            Country::named("Tuvalu", None),
            Country { population: Some(500), ..Country::default() },
            Country::named("Malta", Some(0)),
        ]
    }

    fn names(hits: &[&Country]) -> Vec<String> {
        hits.iter().map(|c| c.display_name().to_string()).collect()
    }

    #[test]
    fn empty_term_and_no_threshold_returns_everything() {
        let records = sample();
        assert_eq!(filter(&records, &FilterCriteria::ALL).len(), records.len());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = sample();
        let hits = filter(&records, &FilterCriteria::new("AL", None));
        assert_eq!(names(&hits), vec!["Albania", "Algeria", "Tuvalu", "Malta"]);

        let hits = filter(&records, &FilterCriteria::new("rr", None));
        assert_eq!(names(&hits), vec!["Andorra"]);
    }

    #[test]
    fn missing_name_never_matches_a_non_empty_term() {
        let nameless = Country { population: Some(10), ..Country::default() };
        assert!(matches_name(&nameless, ""));
        assert!(!matches_name(&nameless, "a"));
    }

    #[test]
    fn threshold_is_strict_and_skips_missing_population() {
        let records = sample();
        let hits = filter(&records, &FilterCriteria::new("", Some(2_800_000)));
        // Tuvalu has no population; Albania sits exactly on the bound.
        assert_eq!(names(&hits), vec!["Andorra", "-", "Malta"]);
    }

    #[test]
    fn threshold_property_holds_for_every_record() {
        let records = sample();
        for limit in [1, 500, 501, 77_001, 5_000_000, u64::MAX] {
            let expected: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, c)| c.population.is_some_and(|p| p < limit))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(filter_indices(&records, &FilterCriteria::new("", Some(limit))), expected);
        }
    }

    #[test]
    fn search_property_holds_for_every_term() {
        let records = sample();
        for term in ["a", "Al", "ALB", "tuv", "zz", "ia"] {
            let expected: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, c)| {
                    c.name_or_empty().to_lowercase().contains(&term.to_lowercase())
                })
                .map(|(i, _)| i)
                .collect();
            assert_eq!(filter_indices(&records, &FilterCriteria::new(term, None)), expected);
        }
    }

    #[test]
    fn both_predicates_are_conjoined() {
        let records = sample();
        let hits = filter(&records, &FilterCriteria::new("al", Some(5_000_000)));
        assert_eq!(names(&hits), vec!["Albania", "Malta"]);
    }

    #[test]
    fn non_ascii_names_match_case_insensitively() {
        let records = vec![Country::named("Åland Islands", Some(30_000))];
        assert_eq!(filter(&records, &FilterCriteria::new("åland", None)).len(), 1);
    }
}
