//! Normalizes the summary file's free-form date strings.
//!
//! The publisher wrote the reporting date in at least five conventions over
//! the years, with and without a year, with locale-flavored am/pm markers,
//! and with a couple of one-off typos. This module turns any of them into a
//! `NaiveDateTime`, or reports which placeholder/header value it hit.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::trace;

use crate::snapshot::labels::{DATE_FORMATS, SKIP_DATES};

#[derive(Error, Debug)]
pub enum DateError {
    #[error("No known date format matched {input:?} (last parse error: {last})")]
    NoFormatMatched {
        input: String,
        #[source]
        last: chrono::ParseError,
    },
}

/// Parse a raw date/time value from the summary file.
///
/// Returns `Ok(None)` for known placeholder values (header rows that leaked
/// into the data), `Ok(Some(..))` for a recognized date, and an error naming
/// the last attempted format's failure when nothing matches.
pub fn normalize(raw: &str) -> Result<Option<NaiveDateTime>, DateError> {
    if SKIP_DATES.iter().any(|&skip| skip == raw) {
        return Ok(None);
    }

    // Locale variants and two known typos in the history.
    let cleaned = raw
        .replace("p.m.", "pm")
        .replace("a.m.", "am")
        .replace(" at ", " ")
        .replace("Augus ", "August ")
        .replace("August10", "August 10");

    let mut last_error = None;
    for format in DATE_FORMATS {
        match try_format(&cleaned, format) {
            Ok(datetime) => {
                trace!("date {:?} matched format {:?}", raw, format);
                return Ok(Some(datetime));
            }
            Err(e) => last_error = Some(e),
        }
    }

    let last = last_error.expect("date format table is not empty");
    Err(DateError::NoFormatMatched {
        input: raw.to_string(),
        last,
    })
}

/// Try a single strftime-style format against the cleaned input.
///
/// The early formats carry no year at all, so this goes through `Parsed`
/// rather than `NaiveDateTime::parse_from_str`: missing pieces (year, minute,
/// second) are filled in before the date is materialized.
fn try_format(input: &str, format: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, input, StrftimeItems::new(format))?;

    if parsed.year().is_none() {
        let month = parsed.month().unwrap_or(1);
        let day = parsed.day().unwrap_or(1);
        parsed.set_year(i64::from(infer_year(month, day)))?;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }

    let date = parsed.to_naive_date()?;
    let time = parsed.to_naive_time()?;
    Ok(NaiveDateTime::new(date, time))
}

/// Year inference for year-less dates.
///
/// The publisher only omitted the year during the dataset's first year of
/// existence, which began in late March 2020. A year-less date before
/// March 25 therefore wrapped around into 2021.
fn infer_year(month: u32, day: u32) -> i32 {
    if (month, day) < (3, 25) {
        2021
    } else {
        2020
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_year_boundary() {
        assert_eq!(infer_year(3, 25), 2020);
        assert_eq!(infer_year(3, 24), 2021);
        assert_eq!(infer_year(1, 1), 2021);
        assert_eq!(infer_year(12, 31), 2020);
    }

    #[test]
    fn test_placeholder_date_is_skipped() {
        let result = normalize("\"Date, time\"").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_explicit_year_is_not_inferred() {
        let parsed = normalize("\"05/12/2020, 1:00PM\"").unwrap().unwrap();
        assert_eq!(parsed.to_string(), "2020-05-12 13:00:00");
    }
}
