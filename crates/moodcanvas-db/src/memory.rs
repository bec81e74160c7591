//! In-memory content and history stores.
//!
//! Used for the built-in seed corpus, for corpora loaded from a JSON file by
//! the CLI, and as test doubles. The history store can be told to fail writes
//! to simulate a persistence outage.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use moodcanvas_core::{
    ContentEntry, ContentStore, EntryId, Error, HistoryRecord, HistoryStore, OwnerScope,
    PopularityMutator, Result,
};

use crate::json_file::{read_json, write_json_atomic};
use crate::seed::seed_entries;

// =============================================================================
// CONTENT
// =============================================================================

/// Content store backed by a vector of entries.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    entries: RwLock<Vec<ContentEntry>>,
}

impl MemoryContentStore {
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Store pre-filled with the built-in seed corpus.
    pub fn seeded() -> Self {
        Self::new(seed_entries())
    }

    /// Load entries from a JSON array file.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let entries: Vec<ContentEntry> = read_json(path)
            .await?
            .ok_or_else(|| Error::NotFound(format!("corpus file {}", path.display())))?;
        info!(
            subsystem = "db",
            component = "content_store",
            path = %path.display(),
            result_count = entries.len(),
            "Loaded corpus file"
        );
        Ok(Self::new(entries))
    }

    /// Write the current entries, popularity included, to a JSON array file.
    pub async fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let entries = self.entries.read().await;
        write_json_atomic(path.as_ref(), &*entries).await
    }

    /// Copy of the current entries.
    pub async fn snapshot(&self) -> Vec<ContentEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn load_entries(&self) -> Result<Vec<ContentEntry>> {
        Ok(self.snapshot().await)
    }
}

#[async_trait]
impl PopularityMutator for MemoryContentStore {
    async fn increment_popularity(&self, entry_id: EntryId) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| Error::NotFound(format!("entry {}", entry_id)))?;
        entry.popularity = entry.popularity.saturating_add(1);
        debug!(
            subsystem = "db",
            component = "content_store",
            op = "increment_popularity",
            entry_id = %entry_id,
            popularity = entry.popularity,
            "Popularity incremented"
        );
        Ok(entry.popularity)
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// History store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    // Insertion order; newest last.
    records: RwLock<Vec<HistoryRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `save` and `delete_all` fail until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Total records across all scopes.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Persistence("history store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save(&self, record: &HistoryRecord) -> Result<()> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        records.retain(|r| r.id != record.id);
        records.push(record.clone());
        Ok(())
    }

    async fn load_recent(&self, scope: &OwnerScope, limit: usize) -> Result<Vec<HistoryRecord>> {
        let records = self.records.read().await;
        let mut scoped: Vec<HistoryRecord> = records
            .iter()
            .rev()
            .filter(|r| &r.owner_scope == scope)
            .cloned()
            .collect();
        // Stable: equal timestamps keep newest-insert-first order.
        scoped.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        scoped.truncate(limit);
        Ok(scoped)
    }

    async fn delete_all(&self, scope: &OwnerScope) -> Result<()> {
        self.check_writable()?;
        self.records.write().await.retain(|r| &r.owner_scope != scope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{entry, record_for};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_content_store_loads_entries_in_order() {
        let store = MemoryContentStore::new(vec![entry("A", &["calm"]), entry("B", &["happy"])]);
        let loaded = store.load_entries().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].quote, "A");
        assert_eq!(loaded[1].quote, "B");
    }

    #[tokio::test]
    async fn test_increment_popularity() {
        let a = entry("A", &["calm"]);
        let id = a.id;
        let store = MemoryContentStore::new(vec![a]);

        assert_eq!(store.increment_popularity(id).await.unwrap(), 1);
        assert_eq!(store.increment_popularity(id).await.unwrap(), 2);
        assert_eq!(store.snapshot().await[0].popularity, 2);
    }

    #[tokio::test]
    async fn test_increment_popularity_unknown_entry() {
        let store = MemoryContentStore::new(vec![]);
        let err = store.increment_popularity(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seeded_store_is_not_empty() {
        let store = MemoryContentStore::seeded();
        assert!(!store.load_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_load_recent_is_newest_first_and_scoped() {
        let store = MemoryHistoryStore::new();
        let user = OwnerScope::User(Uuid::new_v4());
        let e = entry("A", &["calm"]);

        let first = record_for("calm", &e, OwnerScope::Local);
        let second = record_for("calm again", &e, OwnerScope::Local);
        let other = record_for("mine", &e, user.clone());
        store.save(&first).await.unwrap();
        store.save(&other).await.unwrap();
        store.save(&second).await.unwrap();

        let local = store.load_recent(&OwnerScope::Local, 10).await.unwrap();
        assert_eq!(local.len(), 2);
        assert_eq!(local[0].id, second.id);
        assert_eq!(local[1].id, first.id);

        let mine = store.load_recent(&user, 10).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, other.id);

        let limited = store.load_recent(&OwnerScope::Local, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_history_save_same_id_replaces() {
        let store = MemoryHistoryStore::new();
        let e = entry("A", &["calm"]);
        let mut record = record_for("calm", &e, OwnerScope::Local);
        store.save(&record).await.unwrap();
        record.query_text = "calmer".into();
        store.save(&record).await.unwrap();

        assert_eq!(store.len().await, 1);
        let loaded = store.load_recent(&OwnerScope::Local, 10).await.unwrap();
        assert_eq!(loaded[0].query_text, "calmer");
    }

    #[tokio::test]
    async fn test_history_delete_all_only_touches_scope() {
        let store = MemoryHistoryStore::new();
        let user = OwnerScope::User(Uuid::new_v4());
        let e = entry("A", &["calm"]);
        store.save(&record_for("a", &e, OwnerScope::Local)).await.unwrap();
        store.save(&record_for("b", &e, user.clone())).await.unwrap();

        store.delete_all(&OwnerScope::Local).await.unwrap();
        assert!(store.load_recent(&OwnerScope::Local, 10).await.unwrap().is_empty());
        assert_eq!(store.load_recent(&user, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_fail_writes() {
        let store = MemoryHistoryStore::new();
        let e = entry("A", &["calm"]);
        store.fail_writes(true);

        let err = store.save(&record_for("a", &e, OwnerScope::Local)).await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(store.delete_all(&OwnerScope::Local).await.is_err());
        assert!(store.is_empty().await);

        store.fail_writes(false);
        assert!(store.save(&record_for("a", &e, OwnerScope::Local)).await.is_ok());
    }
}
