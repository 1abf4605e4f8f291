//! Access to the snapshot revision history.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error while reading the snapshot history: {0}")]
    Io(#[from] io::Error),

    #[error("{path} at revision {revision} is not valid UTF-8")]
    InvalidUtf8 { revision: String, path: String },
}

/// Opaque handle for one revision of the snapshot history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    pub id: String,
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// A store holding every historical revision of the snapshot files.
///
/// Implementations must list revisions oldest first, and resolve a read
/// against an ordered list of candidate paths, returning the first that
/// exists or `None` when none do. Retrieval itself (clone/pull of the
/// upstream history) is outside this crate; whatever blocking the store does
/// is opaque to the walker.
pub trait RevisionSource {
    fn revisions(&self) -> Result<Vec<Revision>, SourceError>;

    fn read_file(
        &self,
        revision: &Revision,
        candidates: &[&str],
    ) -> Result<Option<String>, SourceError>;
}

/// Filesystem-backed revision source.
///
/// Expects an exported history laid out as one subdirectory per revision,
/// where lexicographic directory order is chronological order (e.g. zero
/// padded sequence numbers or ISO timestamps).
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RevisionSource for DirSource {
    fn revisions(&self) -> Result<Vec<Revision>, SourceError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        ids.sort_unstable();
        debug!(
            "Found {} revision directories under {}",
            ids.len(),
            self.root.display()
        );

        Ok(ids.into_iter().map(|id| Revision { id }).collect())
    }

    fn read_file(
        &self,
        revision: &Revision,
        candidates: &[&str],
    ) -> Result<Option<String>, SourceError> {
        for candidate in candidates {
            let path = self.root.join(&revision.id).join(candidate);
            match fs::read(&path) {
                Ok(bytes) => {
                    return String::from_utf8(bytes).map(Some).map_err(|_| {
                        SourceError::InvalidUtf8 {
                            revision: revision.id.clone(),
                            path: candidate.to_string(),
                        }
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(None)
    }
}
