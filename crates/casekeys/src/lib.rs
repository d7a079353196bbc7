//! Comparison keys derived from the free text found in case records.
//!
//! Everything here is total: text that cannot be read yields a zero key
//! rather than an error.

pub mod chrono_key;
pub mod sentence;

pub use chrono_key::{ChronoKey, FALLBACK_YEAR, MONTHS};
pub use sentence::{months_to_years, sentence_months};
