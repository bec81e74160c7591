//! Core traits for moodcanvas collaborators.
//!
//! These traits define the boundary contracts the engine consumes, enabling
//! pluggable backends (remote database, local file, in-memory) and
//! testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContentEntry, EntryId, HistoryRecord, OwnerScope};

/// Supplies the curated corpus.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load every available entry.
    ///
    /// A failure must surface to the caller; the engine refuses to resolve
    /// rather than fall back to stale data.
    async fn load_entries(&self) -> Result<Vec<ContentEntry>>;
}

/// Turns an opaque artwork reference into a fetchable URL.
pub trait ImageResolver: Send + Sync {
    fn resolve_display_url(&self, image_ref: &str) -> String;
}

/// Backing store for the history ledger.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one record. Writing an existing id replaces it.
    async fn save(&self, record: &HistoryRecord) -> Result<()>;

    /// Up to `limit` records for `scope`, newest first.
    async fn load_recent(&self, scope: &OwnerScope, limit: usize) -> Result<Vec<HistoryRecord>>;

    /// Remove every record for `scope`.
    async fn delete_all(&self, scope: &OwnerScope) -> Result<()>;
}

/// Raises an entry's popularity (the "like" action).
#[async_trait]
pub trait PopularityMutator: Send + Sync {
    /// Increment and return the new popularity.
    async fn increment_popularity(&self, entry_id: EntryId) -> Result<u64>;
}
