//! Historically accumulated label vocabulary for the summary file.
//!
//! These tables are an open-ended enumeration, not a schema: every time the
//! upstream publisher renamed a label or switched date conventions, the new
//! spelling was appended here. New variants are additions to a table, never
//! structural changes. An unknown label is a hard parse failure on purpose,
//! so vocabulary drift is caught during maintenance instead of silently
//! dropping data.

/// Labels that carry no daily statistic and are skipped outright.
pub const SKIP_LABELS: &[&str] = &["MEASURE", "NYC_TOTAL_DEATH_COUNT", "NYC_TOTAL_CASE_COUNT"];

/// Labels whose value is the snapshot's reporting date.
pub const DATE_LABELS: &[&str] = &["As of:", "DATE_UPDATED"];

/// Labels whose values accumulate into the cases total.
pub const CASES_LABELS: &[&str] = &[
    "Cases:",
    "Case count",
    "NYC_PROBABLE_CASE_COUNT",
    "NYC_CASE_COUNT",
];

/// Labels whose values accumulate into the hospitalized total.
pub const HOSPITALIZED_LABELS: &[&str] = &[
    "Known hospitalizations (estimate)",
    "Hospitalizations (estimate):",
    "Total hospitalizations (estimate):",
    "Total hospitalized*:",
    "Hospitalized*:",
    "NYC_HOSPITALIZED_COUNT",
];

/// Labels whose values accumulate into the deaths total. Several of these are
/// sub-categories (confirmed vs. probable) that fold into one figure.
pub const DEATH_LABELS: &[&str] = &[
    "Death count",
    "Deaths:",
    "NYC confirmed deaths:",
    "NYC deaths:",
    "Confirmed",
    "Probable",
    "NYC_CONFIRMED_DEATH_COUNT",
    "NYC_PROBABLE_DEATH_COUNT",
];

/// Date formats seen in the history, tried in this order; the first that
/// parses wins. Ambiguous strings rely on this priority, so the order is part
/// of the contract. The embedded double quotes are literal: date values were
/// CSV-quoted because they contain a comma.
pub const DATE_FORMATS: &[&str] = &[
    "%c",
    "\"%B %d, %I:%M %p\"",
    "\"%B %d, %I.%M %p\"",
    "\"%B %d, %I %p\"",
    "\"%m/%d/%Y, %I:%M%p\"",
];

/// Placeholder date values (column headers that leaked into data rows). A
/// block carrying one of these is abandoned, not failed.
pub const SKIP_DATES: &[&str] = &["\"Date, time\""];

/// The label lookup tables used by the record parser, bundled so tests can
/// substitute a reduced vocabulary.
#[derive(Debug, Clone)]
pub struct LabelTables {
    pub skip_labels: &'static [&'static str],
    pub date_labels: &'static [&'static str],
    pub cases_labels: &'static [&'static str],
    pub hospitalized_labels: &'static [&'static str],
    pub death_labels: &'static [&'static str],
}

impl Default for LabelTables {
    fn default() -> Self {
        Self {
            skip_labels: SKIP_LABELS,
            date_labels: DATE_LABELS,
            cases_labels: CASES_LABELS,
            hospitalized_labels: HOSPITALIZED_LABELS,
            death_labels: DEATH_LABELS,
        }
    }
}

impl LabelTables {
    pub fn is_skip(&self, label: &str) -> bool {
        contains(self.skip_labels, label)
    }

    pub fn is_date(&self, label: &str) -> bool {
        contains(self.date_labels, label)
    }

    pub fn is_cases(&self, label: &str) -> bool {
        contains(self.cases_labels, label)
    }

    pub fn is_hospitalized(&self, label: &str) -> bool {
        contains(self.hospitalized_labels, label)
    }

    pub fn is_death(&self, label: &str) -> bool {
        contains(self.death_labels, label)
    }
}

fn contains(table: &[&str], label: &str) -> bool {
    table.iter().any(|&known| known == label)
}
