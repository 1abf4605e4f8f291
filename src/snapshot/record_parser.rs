//! Extracts one day's statistics from a snapshot's raw text.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::snapshot::date_normalizer::{self, DateError};
use crate::snapshot::labels::LabelTables;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed line (expected `label,value`): {line}\nBlock was:\n{block}")]
    MalformedLine { line: String, block: String },

    #[error("Unknown label: {line}\nBlock was:\n{block}")]
    UnknownLabel { line: String, block: String },

    #[error(transparent)]
    Date(#[from] DateError),
}

/// One snapshot's extracted daily statistics.
///
/// Fields absent from the source text stay `None`; they are not zero. A
/// record is only usable downstream when both the date and the cases total
/// were found, see [`DailyRecord::is_valid`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: Option<NaiveDateTime>,
    pub cases: Option<i64>,
    /// Cases summed over the configured neighborhood ZIP codes, taken from
    /// the breakdown file rather than the summary.
    pub neighborhood_cases: Option<i64>,
    pub hospitalized: Option<i64>,
    pub deaths: Option<i64>,
}

impl DailyRecord {
    /// A record is valid iff the date and the cases total are both present.
    pub fn is_valid(&self) -> bool {
        self.date.is_some() && self.cases.is_some()
    }
}

/// Parser for one revision's summary block plus its optional ZIP breakdown.
///
/// Dispatches each `label,value` line through the historical synonym tables.
/// Any label outside the tables is a hard failure: it means the upstream
/// format drifted again and the tables need a new entry, which must surface
/// to a maintainer instead of being skipped.
pub struct RecordParser {
    tables: LabelTables,
    neighborhood_zips: Vec<String>,
}

impl RecordParser {
    /// Create a parser with the full historical label vocabulary.
    ///
    /// `neighborhood_zips` is the set of ZIP codes whose per-area counts are
    /// summed into [`DailyRecord::neighborhood_cases`].
    pub fn new(neighborhood_zips: Vec<String>) -> Self {
        Self::with_tables(LabelTables::default(), neighborhood_zips)
    }

    pub fn with_tables(tables: LabelTables, neighborhood_zips: Vec<String>) -> Self {
        Self {
            tables,
            neighborhood_zips,
        }
    }

    /// Parse a summary block into a [`DailyRecord`].
    ///
    /// The returned record may be incomplete; callers check
    /// [`DailyRecord::is_valid`]. Errors are reserved for format drift
    /// (unknown label, comma-less line, unparseable date) and carry the
    /// offending line plus the whole block for diagnosis.
    pub fn parse(
        &self,
        summary: &str,
        breakdown: Option<&str>,
    ) -> Result<DailyRecord, ParseError> {
        let mut record = DailyRecord::default();

        for raw_line in summary.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((label, value)) = line.split_once(',') else {
                return Err(ParseError::MalformedLine {
                    line: line.to_string(),
                    block: summary.to_string(),
                });
            };

            if self.tables.is_skip(label) {
                trace!("skipping label {}", label);
            } else if self.tables.is_date(label) {
                record.date = date_normalizer::normalize(value)?;
                if record.date.is_none() {
                    // Placeholder date, i.e. a header row: nothing useful
                    // follows in this block.
                    debug!("placeholder date value {:?}, abandoning block", value);
                    return Ok(record);
                }
            } else if self.tables.is_cases(label) {
                add_count(&mut record.cases, value);
                if record.cases.is_none() {
                    // A cases line that leaves the total unset means the
                    // block is not a statistics snapshot after all.
                    debug!("non-numeric cases value {:?}, abandoning block", value);
                    return Ok(record);
                }
            } else if self.tables.is_hospitalized(label) {
                add_count(&mut record.hospitalized, value);
            } else if self.tables.is_death(label) {
                add_count(&mut record.deaths, value);
            } else {
                return Err(ParseError::UnknownLabel {
                    line: line.to_string(),
                    block: summary.to_string(),
                });
            }
        }

        if let Some(breakdown) = breakdown {
            self.accumulate_breakdown(&mut record, breakdown);
        }

        Ok(record)
    }

    /// Sum the configured ZIP codes' case counts from the breakdown file.
    ///
    /// Each line is `zip,name,...,count,...`; the count is the 4th field.
    /// Every configured ZIP is counted at most once, and scanning stops as
    /// soon as all of them have been seen.
    fn accumulate_breakdown(&self, record: &mut DailyRecord, breakdown: &str) {
        let mut pending: HashSet<&str> =
            self.neighborhood_zips.iter().map(String::as_str).collect();
        if pending.is_empty() {
            return;
        }

        for line in breakdown.lines() {
            let mut fields = line.trim().splitn(5, ',');
            let zip = fields.next().unwrap_or_default();
            if pending.remove(zip) {
                if let Some(count) = fields.nth(2) {
                    add_count(&mut record.neighborhood_cases, count);
                }
                if pending.is_empty() {
                    return;
                }
            }
        }

        debug!(
            "breakdown file missing {} of the configured ZIP codes",
            pending.len()
        );
    }
}

/// Accumulate a value into a possibly-absent running total.
///
/// Several differently-labeled lines (e.g. confirmed and probable deaths)
/// fold into the same total. Unparseable values leave the total untouched,
/// so an absent total stays absent.
fn add_count(total: &mut Option<i64>, value: &str) {
    if let Ok(n) = value.trim().parse::<i64>() {
        *total = Some(total.unwrap_or(0) + n);
    }
}
