// Snapshot parsing module
//
// Each revision of the tracked dataset carries a summary file of `label,value`
// lines plus an optional per-ZIP breakdown file. The label vocabulary, date
// encoding, and layout all drifted repeatedly over the life of the dataset;
// the tables in `labels` enumerate every spelling seen so far.

pub mod date_normalizer;
pub mod labels;
pub mod record_parser;

pub use labels::LabelTables;
pub use record_parser::{DailyRecord, ParseError, RecordParser};
