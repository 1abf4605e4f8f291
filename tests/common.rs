// Shared test fixtures: an in-memory revision source so walker and series
// tests can script a snapshot history without touching the filesystem.
#![allow(dead_code)]

use std::collections::HashMap;

use case_tracker_service::history::{Revision, RevisionSource, SourceError};

/// In-memory revision history. Revisions are yielded in insertion order,
/// which stands in for chronological order.
#[derive(Default)]
pub struct MemorySource {
    revisions: Vec<(String, HashMap<String, String>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_revision(&mut self, id: &str, files: &[(&str, &str)]) {
        let files = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect();
        self.revisions.push((id.to_string(), files));
    }
}

impl RevisionSource for MemorySource {
    fn revisions(&self) -> Result<Vec<Revision>, SourceError> {
        Ok(self
            .revisions
            .iter()
            .map(|(id, _)| Revision { id: id.clone() })
            .collect())
    }

    fn read_file(
        &self,
        revision: &Revision,
        candidates: &[&str],
    ) -> Result<Option<String>, SourceError> {
        let Some((_, files)) = self.revisions.iter().find(|(id, _)| *id == revision.id) else {
            return Ok(None);
        };

        for candidate in candidates {
            if let Some(content) = files.get(*candidate) {
                return Ok(Some(content.clone()));
            }
        }
        Ok(None)
    }
}

/// Build a minimal summary block in the early hand-written format.
pub fn summary_block(date: &str, cases: i64) -> String {
    format!("As of:,\"{date}\"\nCases:,{cases}")
}
