//! Value types shared by every record kind

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RangeFields")]
pub struct DateRange {
    /// First day
    pub start: NaiveDate,
    /// Last day (never before `start`)
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Range covering a single day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Inclusive overlap: ranges sharing even a single day overlap, so a
    /// same-day handoff is reported as a clash.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True when `other` lies entirely within this range
    pub fn contains(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Deserialize)]
struct RangeFields {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RangeFields> for DateRange {
    type Error = ValidationError;

    fn try_from(fields: RangeFields) -> Result<Self, Self::Error> {
        DateRange::new(fields.start, fields.end).ok_or_else(|| {
            ValidationError::new(
                "end",
                format!("end {} is before start {}", fields.end, fields.start),
            )
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Set of normalised skill, capability or certification tokens.
///
/// Tokens are trimmed and lower-cased; empty tokens are dropped. Ordering is
/// lexicographic, which keeps every rendering of the set deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-delimited list
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    pub fn normalize(token: &str) -> Option<String> {
        let token = token.trim().to_lowercase();
        (!token.is_empty()).then_some(token)
    }

    pub fn insert(&mut self, token: &str) -> bool {
        match Self::normalize(token) {
            Some(token) => self.0.insert(token),
            None => false,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        Self::normalize(token).is_some_and(|t| self.0.contains(&t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// True when every token of `self` is present in `other`
    pub fn is_subset(&self, other: &TokenSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Tokens of `self` absent from `other`, in order
    pub fn missing_from<'a>(&'a self, other: &'a TokenSet) -> Vec<&'a str> {
        self.0
            .difference(&other.0)
            .map(String::as_str)
            .collect()
    }

    /// Count of tokens shared with `other`
    pub fn overlap(&self, other: &TokenSet) -> usize {
        self.0.intersection(&other.0).count()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter_map(|t| Self::normalize(t.as_ref()))
                .collect(),
        )
    }
}

impl From<Vec<String>> for TokenSet {
    fn from(tokens: Vec<String>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<TokenSet> for Vec<String> {
    fn from(set: TokenSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// Exact location comparison ignoring surrounding whitespace and case.
/// No geographic distance is modelled.
pub fn locations_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_dates() {
        assert!(DateRange::new(date(2024, 6, 3), date(2024, 6, 1)).is_none());
        assert!(DateRange::new(date(2024, 6, 1), date(2024, 6, 1)).is_some());
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = DateRange::new(date(2024, 6, 1), date(2024, 6, 3)).unwrap();
        let handoff = DateRange::new(date(2024, 6, 3), date(2024, 6, 5)).unwrap();
        let after = DateRange::new(date(2024, 6, 4), date(2024, 6, 5)).unwrap();

        assert!(a.overlaps(&a));
        assert!(a.overlaps(&handoff));
        assert!(handoff.overlaps(&a));
        assert!(!a.overlaps(&after));
    }

    #[test]
    fn test_contains_and_days() {
        let outer = DateRange::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();
        let inner = DateRange::new(date(2024, 6, 10), date(2024, 6, 12)).unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert_eq!(inner.days(), 3);
        assert_eq!(DateRange::day(date(2024, 6, 1)).days(), 1);
    }

    #[test]
    fn test_token_set_normalisation() {
        let set = TokenSet::parse(" Thermal,MAPPING , ,thermal");
        assert_eq!(set.len(), 2);
        assert!(set.contains("thermal"));
        assert!(set.contains(" Mapping"));
        assert_eq!(set.to_string(), "mapping, thermal");
    }

    #[test]
    fn test_token_set_relations() {
        let required = TokenSet::parse("thermal, lidar");
        let held = TokenSet::parse("thermal, mapping");

        assert!(!required.is_subset(&held));
        assert_eq!(required.missing_from(&held), vec!["lidar"]);
        assert_eq!(required.overlap(&held), 1);
        assert!(TokenSet::new().is_subset(&held));
    }

    #[test]
    fn test_range_deserialize_rejects_inverted_dates() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start": "2024-06-01", "end": "2024-06-03"}"#).unwrap();
        assert_eq!(ok.days(), 3);

        let err = serde_json::from_str::<DateRange>(r#"{"start": "2024-06-10", "end": "2024-06-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn test_token_set_deserialize_normalises() {
        let set: TokenSet = serde_json::from_str(r#"[" Thermal", "MAPPING", "", "thermal"]"#).unwrap();
        assert_eq!(set, TokenSet::parse("thermal, mapping"));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["mapping","thermal"]"#);
    }

    #[test]
    fn test_locations_match() {
        assert!(locations_match("Austin", " austin "));
        assert!(!locations_match("Austin", "Dallas"));
        assert!(!locations_match("Austin", "Austin, TX"));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn range() -> impl Strategy<Value = DateRange> {
            (0i64..400, 0i64..30).prop_map(|(offset, len)| {
                let start = date(2024, 1, 1) + chrono::Duration::days(offset);
                DateRange::new(start, start + chrono::Duration::days(len)).unwrap()
            })
        }

        proptest! {
            #[test]
            fn overlap_is_symmetric(a in range(), b in range()) {
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }

            #[test]
            fn range_overlaps_itself_and_contains_itself(a in range()) {
                prop_assert!(a.overlaps(&a));
                prop_assert!(a.contains(&a));
            }

            #[test]
            fn token_parse_is_idempotent(raw in "[A-Za-z ,]{0,40}") {
                let once = TokenSet::parse(&raw);
                let twice = TokenSet::parse(&once.iter().collect::<Vec<_>>().join(","));
                prop_assert_eq!(once, twice);
            }
        }
    }
}
