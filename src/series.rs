//! Folds the stream of per-revision records into the ordered daily table.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::snapshot::DailyRecord;

/// One row of the reconstructed daily table.
///
/// Each statistic carries its cumulative total and the day-over-day delta
/// versus the previous retained row. The date is the adjusted date: the raw
/// reporting date shifted back one day, since snapshots describe the day
/// before they were published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub cases: i64,
    pub cases_delta: i64,
    pub neighborhood_cases: i64,
    pub neighborhood_cases_delta: i64,
    pub hospitalized: i64,
    pub hospitalized_delta: i64,
    pub deaths: i64,
    pub deaths_delta: i64,
}

/// Accumulates candidate records into a monotonically dated table.
///
/// The fold is an explicit three-way comparison against the last retained
/// row's date rather than a generic upsert, which keeps the monotonic-table
/// invariant auditable:
/// - equal date: the previous row was a superseded same-day snapshot and is
///   replaced,
/// - earlier date: the candidate regressed and is discarded (the table never
///   rewinds),
/// - later date: appended as a new day.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    rows: Vec<SeriesRow>,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one candidate record into the table. Invalid records (missing
    /// date or cases) are discarded without effect.
    pub fn push(&mut self, record: &DailyRecord) {
        if !record.is_valid() {
            debug!("Discarding invalid record: {:?}", record);
            return;
        }
        let date = match record.date {
            Some(datetime) => datetime.date(),
            None => return,
        };

        if let Some(last) = self.rows.last() {
            match date.cmp(&last.date) {
                Ordering::Equal => {
                    debug!("Same-day correction for {}, replacing previous row", date);
                    self.rows.pop();
                }
                Ordering::Less => {
                    debug!(
                        "Out-of-order record for {} while table is at {}, discarding",
                        date, last.date
                    );
                    return;
                }
                Ordering::Greater => {}
            }
        }

        let previous = self.rows.last();
        let (cases, cases_delta) = column(record.cases, previous.map_or(0, |r| r.cases));
        let (neighborhood_cases, neighborhood_cases_delta) = column(
            record.neighborhood_cases,
            previous.map_or(0, |r| r.neighborhood_cases),
        );
        let (hospitalized, hospitalized_delta) =
            column(record.hospitalized, previous.map_or(0, |r| r.hospitalized));
        let (deaths, deaths_delta) = column(record.deaths, previous.map_or(0, |r| r.deaths));

        self.rows.push(SeriesRow {
            date,
            cases,
            cases_delta,
            neighborhood_cases,
            neighborhood_cases_delta,
            hospitalized,
            hospitalized_delta,
            deaths,
            deaths_delta,
        });
    }

    /// Finalize the table, shifting every row back to its adjusted date.
    pub fn finish(mut self) -> SeriesTable {
        for row in &mut self.rows {
            row.date = row.date - Duration::days(1);
        }
        SeriesTable { rows: self.rows }
    }

    /// Drain a record stream into a finished table, stopping at the first
    /// stream error (a parse failure ends the whole walk by design).
    pub fn collect<E>(
        records: impl IntoIterator<Item = Result<DailyRecord, E>>,
    ) -> Result<SeriesTable, E> {
        let mut builder = SeriesBuilder::new();
        for record in records {
            builder.push(&record?);
        }
        Ok(builder.finish())
    }
}

/// The finished daily table, ordered by strictly increasing adjusted date.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesTable {
    rows: Vec<SeriesRow>,
}

impl SeriesTable {
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by its adjusted date.
    pub fn get(&self, date: NaiveDate) -> Option<&SeriesRow> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|index| &self.rows[index])
    }

    /// The last `n` rows as a table of their own.
    pub fn tail(&self, n: usize) -> SeriesTable {
        let start = self.rows.len().saturating_sub(n);
        SeriesTable {
            rows: self.rows[start..].to_vec(),
        }
    }
}

impl fmt::Display for SeriesTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>8} {:>12} {:>19} {:>25} {:>13} {:>19} {:>7} {:>13}",
            "Date",
            "Cases",
            "Delta_Cases",
            "Neighborhood_Cases",
            "Delta_Neighborhood_Cases",
            "Hospitalized",
            "Delta_Hospitalized",
            "Deaths",
            "Delta_Deaths",
        )?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<10} {:>8} {:>12} {:>19} {:>25} {:>13} {:>19} {:>7} {:>13}",
                row.date,
                row.cases,
                row.cases_delta,
                row.neighborhood_cases,
                row.neighborhood_cases_delta,
                row.hospitalized,
                row.hospitalized_delta,
                row.deaths,
                row.deaths_delta,
            )?;
        }

        Ok(())
    }
}

fn column(total: Option<i64>, previous: i64) -> (i64, i64) {
    let total = total.unwrap_or(0);
    (total, total - previous)
}
