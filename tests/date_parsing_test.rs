/// Integration tests for the date normalizer: every historical convention,
/// the cleanup rules, and the missing-year inference.
use case_tracker_service::snapshot::date_normalizer::{normalize, DateError};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

fn expect(raw: &str) -> NaiveDateTime {
    normalize(raw)
        .unwrap_or_else(|e| panic!("{raw:?} should normalize: {e}"))
        .unwrap_or_else(|| panic!("{raw:?} should not be a placeholder"))
}

fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn test_ctime_format() {
    assert_eq!(
        expect("Sun Mar 22 15:00:00 2020"),
        datetime(2020, 3, 22, 15, 0)
    );
}

#[test]
fn test_quoted_month_day_colon_time() {
    assert_eq!(expect("\"April 14, 6:00 PM\""), datetime(2020, 4, 14, 18, 0));
}

#[test]
fn test_quoted_month_day_dot_time() {
    assert_eq!(expect("\"July 4, 9.30 am\""), datetime(2020, 7, 4, 9, 30));
}

#[test]
fn test_quoted_month_day_hour_only() {
    assert_eq!(expect("\"June 1, 6 PM\""), datetime(2020, 6, 1, 18, 0));
}

#[test]
fn test_quoted_slash_format_with_year() {
    assert_eq!(
        expect("\"05/12/2020, 1:00PM\""),
        datetime(2020, 5, 12, 13, 0)
    );
}

#[test]
fn test_locale_meridiem_variants() {
    // March 30 is past the March 25 boundary, so the inferred year is 2020.
    assert_eq!(
        expect("\"March 30, 5:00 p.m.\""),
        datetime(2020, 3, 30, 17, 0)
    );
    assert_eq!(
        expect("\"March 30, 9:00 a.m.\""),
        datetime(2020, 3, 30, 9, 0)
    );
    // And the variants still infer the later year before the boundary.
    assert_eq!(
        expect("\"March 24, 5:00 p.m.\""),
        datetime(2021, 3, 24, 17, 0)
    );
}

#[test]
fn test_at_connector_is_dropped() {
    assert_eq!(
        expect("\"April 20, at 5:00 PM\""),
        datetime(2020, 4, 20, 17, 0)
    );
}

#[test]
fn test_known_typos_are_corrected() {
    assert_eq!(
        expect("\"Augus 10, 5:00 PM\""),
        datetime(2020, 8, 10, 17, 0)
    );
    assert_eq!(
        expect("\"August10, 5:00 PM\""),
        datetime(2020, 8, 10, 17, 0)
    );
}

#[test]
fn test_missing_year_inference_boundary() {
    // The dataset began in late March 2020; year-less dates before March 25
    // belong to the following calendar year.
    assert_eq!(expect("\"March 25, 12:00 PM\"").date().year(), 2020);
    assert_eq!(expect("\"March 24, 12:00 PM\"").date().year(), 2021);
    assert_eq!(expect("\"January 1, 12:00 PM\"").date().year(), 2021);
    assert_eq!(expect("\"March 1, 12:00 PM\"").date().year(), 2021);
    assert_eq!(expect("\"December 31, 12:00 PM\"").date().year(), 2020);
}

#[test]
fn test_placeholder_returns_no_value() {
    assert_eq!(normalize("\"Date, time\"").unwrap(), None);
}

#[test]
fn test_unrecognized_string_reports_last_format_error() {
    let err = normalize("not a date at all").unwrap_err();
    assert!(matches!(err, DateError::NoFormatMatched { .. }));
    let message = err.to_string();
    assert!(message.contains("not a date"), "message was: {message}");
    // Failure always carries the last attempted format's own parse error.
    assert!(
        message.contains("last parse error"),
        "message was: {message}"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_round_trip_through_accepted_format() {
    // Formatting a normalized date back into an accepted input format and
    // normalizing again must land on the same instant.
    let original = expect("\"05/12/2020, 1:00PM\"");
    let formatted = original.format("\"%m/%d/%Y, %I:%M%p\"").to_string();
    assert_eq!(expect(&formatted), original);
}
