//! Population thresholds and the fixed select buckets.

use std::fmt;

/// One of the fixed options offered by the population select control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopulationBucket {
    Under1M,
    Under5M,
    Under10M,
}

impl PopulationBucket {
    /// All buckets in select order.
    pub const ALL: [Self; 3] = [Self::Under1M, Self::Under5M, Self::Under10M];

    /// Exclusive upper bound applied by this bucket.
    #[must_use]
    pub const fn threshold(self) -> u64 {
        match self {
            Self::Under1M => 1_000_000,
            Self::Under5M => 5_000_000,
            Self::Under10M => 10_000_000,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under1M => "< 1M",
            Self::Under5M => "< 5M",
            Self::Under10M => "< 10M",
        }
    }

    /// Maps a threshold back onto a bucket, if it is one of the fixed values.
    #[must_use]
    pub fn from_threshold(threshold: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.threshold() == threshold)
    }

    /// Selects a bucket by its 1-based position in the select control.
    #[must_use]
    pub fn from_position(position: usize) -> Option<Self> {
        position.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Steps the select control: none → 1M → 5M → 10M → none.
    ///
    /// # Examples
    ///
    /// ```
    /// use country_browser::filter::PopulationBucket;
    ///
    /// let mut selected = None;
    /// selected = PopulationBucket::next(selected);
    /// assert_eq!(selected, Some(PopulationBucket::Under1M));
    /// selected = PopulationBucket::next(PopulationBucket::next(PopulationBucket::next(selected)));
    /// assert_eq!(selected, None);
    /// ```
    #[must_use]
    pub const fn next(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Under1M),
            Some(Self::Under1M) => Some(Self::Under5M),
            Some(Self::Under5M) => Some(Self::Under10M),
            Some(Self::Under10M) => None,
        }
    }
}

impl fmt::Display for PopulationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a threshold with `parseInt`-style leniency.
///
/// Leading whitespace and an optional sign are accepted, then as many digits
/// as are present; trailing text is ignored. No digits, or a value of zero,
/// mean "no threshold". A negative value yields `Some(0)`, which no
/// population can satisfy.
///
/// # Examples
///
/// ```
/// use country_browser::filter::parse_threshold;
///
/// assert_eq!(parse_threshold("5000000"), Some(5_000_000));
/// assert_eq!(parse_threshold(" 10000000 people"), Some(10_000_000));
/// assert_eq!(parse_threshold(""), None);
/// assert_eq!(parse_threshold("0"), None);
/// assert_eq!(parse_threshold("many"), None);
/// ```
#[must_use]
pub fn parse_threshold(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return None;
    }

    // Saturate instead of failing on absurdly long digit runs.
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    match (value, negative) {
        (0, _) => None,
        (_, true) => Some(0),
        (v, false) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_carry_fixed_thresholds() {
        assert_eq!(PopulationBucket::Under1M.threshold(), 1_000_000);
        assert_eq!(PopulationBucket::Under5M.threshold(), 5_000_000);
        assert_eq!(PopulationBucket::Under10M.threshold(), 10_000_000);
        assert_eq!(PopulationBucket::Under5M.to_string(), "< 5M");
    }

    #[test]
    fn threshold_round_trips_through_bucket() {
        for bucket in PopulationBucket::ALL {
            assert_eq!(PopulationBucket::from_threshold(bucket.threshold()), Some(bucket));
        }
        assert_eq!(PopulationBucket::from_threshold(42), None);
    }

    #[test]
    fn position_selects_bucket() {
        assert_eq!(PopulationBucket::from_position(0), None);
        assert_eq!(PopulationBucket::from_position(1), Some(PopulationBucket::Under1M));
        assert_eq!(PopulationBucket::from_position(3), Some(PopulationBucket::Under10M));
        assert_eq!(PopulationBucket::from_position(4), None);
    }

    #[test]
    fn cycling_visits_every_bucket_then_unsets() {
        let mut seen = vec![];
        let mut current = None;
        for _ in 0..4 {
            current = PopulationBucket::next(current);
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![
                Some(PopulationBucket::Under1M),
                Some(PopulationBucket::Under5M),
                Some(PopulationBucket::Under10M),
                None,
            ]
        );
    }

    #[test]
    fn parse_follows_leading_digit_rules() {
        assert_eq!(parse_threshold("+7"), Some(7));
        assert_eq!(parse_threshold("12abc"), Some(12));
        assert_eq!(parse_threshold("abc12"), None);
        assert_eq!(parse_threshold("-"), None);
        assert_eq!(parse_threshold("-0"), None);
        assert_eq!(parse_threshold("-5"), Some(0));
        assert_eq!(parse_threshold("99999999999999999999999"), Some(u64::MAX));
    }
}
