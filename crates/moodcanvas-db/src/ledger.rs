//! Bounded interaction history.
//!
//! The ledger keeps the newest `cap` resolutions for one owner scope, newest
//! first. Every change is written through to a [`HistoryStore`] before the
//! in-memory view is touched, so a failed write leaves the ledger exactly as
//! it was.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, warn};

use moodcanvas_core::{Error, HistoryRecord, HistoryRecordInput, HistoryStore, OwnerScope, Result};

/// Newest-first, size-bounded record of past resolutions.
pub struct HistoryLedger {
    cap: usize,
    scope: OwnerScope,
    records: VecDeque<HistoryRecord>,
    store: Arc<dyn HistoryStore>,
}

impl std::fmt::Debug for HistoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLedger")
            .field("cap", &self.cap)
            .field("scope", &self.scope)
            .field("len", &self.records.len())
            .finish()
    }
}

impl HistoryLedger {
    /// Create an empty ledger. Nothing is read from the store.
    pub fn new(store: Arc<dyn HistoryStore>, scope: OwnerScope, cap: usize) -> Self {
        Self {
            cap,
            scope,
            records: VecDeque::with_capacity(cap),
            store,
        }
    }

    /// Create a ledger pre-filled with the newest `cap` stored records.
    pub async fn load(store: Arc<dyn HistoryStore>, scope: OwnerScope, cap: usize) -> Result<Self> {
        let mut ledger = Self::new(store, scope, cap);
        if cap == 0 {
            return Ok(ledger);
        }

        let mut recent = ledger
            .store
            .load_recent(&ledger.scope, cap)
            .await
            .map_err(into_persistence)?;
        recent.truncate(cap);
        info!(
            subsystem = "db",
            component = "ledger",
            op = "load",
            owner_scope = %ledger.scope,
            result_count = recent.len(),
            "History ledger loaded"
        );
        ledger.records = recent.into();
        Ok(ledger)
    }

    /// Store a new record as the newest entry.
    ///
    /// Assigns an id and timestamp when the input has none and stamps the
    /// ledger's owner scope. The oldest records are evicted once the cap is
    /// exceeded; a record with the same id as an existing one replaces it.
    ///
    /// If persistence fails the ledger is unchanged and the failure is
    /// returned as [`Error::Persistence`]. With a cap of 0 history is
    /// disabled: the record is built and returned but neither kept nor
    /// persisted.
    pub async fn append(&mut self, input: HistoryRecordInput) -> Result<HistoryRecord> {
        let mut input = input;
        input.owner_scope = self.scope.clone();
        let record = input.into_record();

        if self.cap == 0 {
            debug!(
                subsystem = "db",
                component = "ledger",
                record_id = %record.id,
                "History disabled, record not kept"
            );
            return Ok(record);
        }

        if let Err(e) = self.store.save(&record).await {
            warn!(
                subsystem = "db",
                component = "ledger",
                op = "append",
                record_id = %record.id,
                owner_scope = %self.scope,
                error = %e,
                "History write failed, ledger unchanged"
            );
            return Err(into_persistence(e));
        }

        self.records.retain(|r| r.id != record.id);
        self.records.push_front(record.clone());
        while self.records.len() > self.cap {
            if let Some(evicted) = self.records.pop_back() {
                debug!(
                    subsystem = "db",
                    component = "ledger",
                    record_id = %evicted.id,
                    "Evicted oldest history record"
                );
            }
        }

        debug!(
            subsystem = "db",
            component = "ledger",
            op = "append",
            record_id = %record.id,
            result_count = self.records.len(),
            "History record appended"
        );
        Ok(record)
    }

    /// Records newest first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    /// Iterate records newest first without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    /// Remove every record for this scope, in the store and in memory.
    pub async fn clear(&mut self) -> Result<()> {
        self.store
            .delete_all(&self.scope)
            .await
            .map_err(into_persistence)?;
        let removed = self.records.len();
        self.records.clear();
        info!(
            subsystem = "db",
            component = "ledger",
            op = "clear",
            owner_scope = %self.scope,
            result_count = removed,
            "History cleared"
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn scope(&self) -> &OwnerScope {
        &self.scope
    }

    /// The backing store.
    pub fn store(&self) -> Arc<dyn HistoryStore> {
        Arc::clone(&self.store)
    }
}

fn into_persistence(e: Error) -> Error {
    match e {
        Error::Persistence(_) => e,
        other => Error::Persistence(other.to_string()),
    }
}
