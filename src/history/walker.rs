//! Walks the revision history and yields one candidate record per revision.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::history::source::{Revision, RevisionSource, SourceError};
use crate::snapshot::{DailyRecord, ParseError, RecordParser};

/// Primary per-revision statistics file.
pub const SUMMARY_FILE_NAME: &str = "summary.csv";
/// Optional per-revision breakdown-by-ZIP file.
pub const BREAKDOWN_FILE_NAME: &str = "data-by-modzcta.csv";

/// Revisions committed with an unresolved merge are unusable snapshots.
const CONFLICT_MARKER: &str = "<<<<<<< HEAD";

#[derive(Error, Debug)]
pub enum WalkError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Failed to parse snapshot at revision {revision}: {source}")]
    Parse {
        revision: String,
        source: ParseError,
    },
}

/// Lazy, forward-only iterator over the history, oldest revision first.
///
/// Unusable revisions (missing summary file, merge-conflict leftovers) are
/// skipped silently. Parse failures are not skipped: they end the walk, since
/// an unknown label means the vocabulary tables are stale and a maintainer
/// has to extend them.
pub struct HistoryWalker<S: RevisionSource> {
    source: S,
    parser: RecordParser,
    summary_file: String,
    breakdown_file: String,
    revisions: std::vec::IntoIter<Revision>,
}

impl<S: RevisionSource> HistoryWalker<S> {
    pub fn new(source: S, parser: RecordParser) -> Result<Self, SourceError> {
        Self::with_file_names(source, parser, SUMMARY_FILE_NAME, BREAKDOWN_FILE_NAME)
    }

    pub fn with_file_names(
        source: S,
        parser: RecordParser,
        summary_file: impl Into<String>,
        breakdown_file: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let revisions = source.revisions()?;
        info!("Walking {} revisions", revisions.len());

        Ok(Self {
            source,
            parser,
            summary_file: summary_file.into(),
            breakdown_file: breakdown_file.into(),
            revisions: revisions.into_iter(),
        })
    }

    /// Read a named file at a revision, trying the `totals/` location first.
    ///
    /// Content is trimmed and a leading byte-order mark is stripped; early
    /// snapshots were exported from tooling that prepended one.
    fn read_text(&self, revision: &Revision, name: &str) -> Result<Option<String>, SourceError> {
        let prefixed = format!("totals/{name}");
        let raw = self.source.read_file(revision, &[&prefixed, name])?;

        Ok(raw.map(|content| {
            let trimmed = content.trim();
            trimmed.strip_prefix('\u{feff}').unwrap_or(trimmed).to_string()
        }))
    }
}

impl<S: RevisionSource> Iterator for HistoryWalker<S> {
    type Item = Result<DailyRecord, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let revision = self.revisions.next()?;

            let summary = match self.read_text(&revision, &self.summary_file) {
                Ok(summary) => summary,
                Err(e) => return Some(Err(e.into())),
            };
            let summary = match summary {
                Some(summary) => summary,
                None => {
                    debug!("Revision {}: no summary file, skipping", revision);
                    continue;
                }
            };
            if summary.contains(CONFLICT_MARKER) {
                warn!(
                    "Revision {}: summary has an unresolved merge conflict, skipping",
                    revision
                );
                continue;
            }

            let breakdown = match self.read_text(&revision, &self.breakdown_file) {
                Ok(breakdown) => breakdown,
                Err(e) => return Some(Err(e.into())),
            };

            return Some(
                self.parser
                    .parse(&summary, breakdown.as_deref())
                    .map_err(|e| {
                        error!("Error at revision {}: {}", revision, e);
                        WalkError::Parse {
                            revision: revision.id,
                            source: e,
                        }
                    }),
            );
        }
    }
}
