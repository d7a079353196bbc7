use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Year used when a month name is found but no four-digit year is.
///
/// This is lossy: a record reading "March 14" lands in March 2019 whatever
/// year it really belongs to. It is kept so orderings stay comparable with
/// the published tables.
pub const FALLBACK_YEAR: u32 = 2019;

/// English month names in lookup order. The first name contained in the
/// text wins, so "January" is tried before "March".
pub const MONTHS: [(&str, u32); 12] = [
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is valid"));

/// Year and month packed as `year * 100 + month`. Zero means undated.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ChronoKey(u32);

impl ChronoKey {
    pub const UNDATED: ChronoKey = ChronoKey(0);

    pub fn new(year: u32, month: u32) -> Self {
        Self(year * 100 + month)
    }

    /// Read a loosely formatted date such as "Convicted March 14, 2019".
    ///
    /// The month is the first entry of [`MONTHS`] found as a case-sensitive
    /// substring; the year is the first run of four ASCII digits anywhere in
    /// the text, or [`FALLBACK_YEAR`] if there is none. Text without a month
    /// name is undated.
    pub fn parse(text: &str) -> Self {
        let Some(&(_, month)) =
            MONTHS.iter().find(|(name, _)| text.contains(name))
        else {
            return Self::UNDATED;
        };
        let year = YEAR
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(FALLBACK_YEAR);
        Self::new(year, month)
    }

    /// Parse an optional date; absent dates are undated.
    pub fn parse_opt(text: Option<&str>) -> Self {
        text.map(Self::parse).unwrap_or(Self::UNDATED)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_undated(self) -> bool {
        self.0 == 0
    }

    pub fn year(self) -> Option<u32> {
        (!self.is_undated()).then_some(self.0 / 100)
    }

    pub fn month(self) -> Option<u32> {
        (!self.is_undated()).then_some(self.0 % 100)
    }
}

impl fmt::Display for ChronoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.year(), self.month()) {
            (Some(year), Some(month)) => {
                write!(f, "{year:04}-{month:02}")
            }
            _ => f.write_str("undated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_month_and_year_from_prose() {
        assert_eq!(
            ChronoKey::parse("Convicted March 14, 2019").value(),
            201903
        );
        assert_eq!(ChronoKey::parse("December 2, 2021").value(), 202112);
        assert_eq!(ChronoKey::parse("May 2017").value(), 201705);
    }

    #[test]
    fn text_without_month_is_undated() {
        assert_eq!(ChronoKey::parse("2019-03-14"), ChronoKey::UNDATED);
        assert_eq!(ChronoKey::parse(""), ChronoKey::UNDATED);
        assert_eq!(ChronoKey::parse_opt(None), ChronoKey::UNDATED);
        assert!(ChronoKey::parse("pending").is_undated());
    }

    #[test]
    fn month_names_are_case_sensitive() {
        assert!(ChronoKey::parse("march 14, 2019").is_undated());
    }

    #[test]
    fn missing_year_falls_back() {
        let key = ChronoKey::parse("March 14");
        assert_eq!(key.year(), Some(FALLBACK_YEAR));
        assert_eq!(key.month(), Some(3));
        assert_eq!(key.value(), 201903);
    }

    #[test]
    fn earliest_month_in_table_wins() {
        // Month and year are found independently: January from the table
        // walk, 2020 as the first four-digit run.
        assert_eq!(
            ChronoKey::parse("pleaded March 2020, indicted January 2019")
                .value(),
            202001
        );
    }

    #[test]
    fn first_four_digit_run_is_the_year() {
        assert_eq!(
            ChronoKey::parse("June 3, 2016 (case 2018-44)").value(),
            201606
        );
    }

    #[test]
    fn undated_sorts_before_dated() {
        let mut keys = vec![
            ChronoKey::parse("July 2018"),
            ChronoKey::parse("unknown"),
            ChronoKey::parse("February 2017"),
        ];
        keys.sort();
        assert_eq!(
            keys.iter().map(|k| k.value()).collect::<Vec<_>>(),
            vec![0, 201702, 201807]
        );
    }

    #[test]
    fn display_is_iso_like() {
        assert_eq!(ChronoKey::new(2019, 3).to_string(), "2019-03");
        assert_eq!(ChronoKey::UNDATED.to_string(), "undated");
    }
}
