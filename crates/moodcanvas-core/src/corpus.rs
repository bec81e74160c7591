//! Immutable corpus snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{ContentEntry, EntryId};
use crate::tags::normalize_tags;

/// A read-only snapshot of the content store.
///
/// Matching and selection run against one snapshot for their whole duration.
/// Reloading produces a new snapshot; clones share the same entries.
#[derive(Debug, Clone)]
pub struct ContentCorpus {
    entries: Arc<[ContentEntry]>,
    loaded_at: DateTime<Utc>,
}

impl ContentCorpus {
    /// Build a snapshot from store entries.
    ///
    /// Tags are re-normalized and entries with a blank quote are dropped,
    /// keeping the store's order otherwise.
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        let entries: Vec<ContentEntry> = entries
            .into_iter()
            .filter_map(|mut entry| {
                if let Err(e) = entry.validate() {
                    warn!(
                        subsystem = "core",
                        component = "corpus",
                        entry_id = %entry.id,
                        error = %e,
                        "Skipping unusable content entry"
                    );
                    return None;
                }
                entry.tags = normalize_tags(&entry.tags);
                Some(entry)
            })
            .collect();

        Self {
            entries: entries.into(),
            loaded_at: Utc::now(),
        }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// All entries in store order.
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When this snapshot was taken.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&ContentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Every distinct tag, in order of first appearance.
    pub fn distinct_tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tag in self.entries.iter().flat_map(|e| e.tags.iter()) {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag.as_str());
            }
        }
        seen
    }
}

impl From<Vec<ContentEntry>> for ContentCorpus {
    fn from(entries: Vec<ContentEntry>) -> Self {
        Self::new(entries)
    }
}
