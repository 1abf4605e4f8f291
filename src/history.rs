// Revision history module
//
// The dataset's snapshot history lives in an external versioned store. The
// core only depends on the `RevisionSource` interface (list revisions oldest
// first, read a file at a revision); `DirSource` is the filesystem adapter
// for an exported history, and tests supply in-memory sources.

pub mod source;
pub mod walker;

pub use source::{DirSource, Revision, RevisionSource, SourceError};
pub use walker::{HistoryWalker, WalkError};
