//! JSON file persistence.
//!
//! Local, anonymous history lives in a single JSON array on disk, newest
//! record first. Writes go through a temp file and a rename so a crash never
//! leaves a half-written history behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use moodcanvas_core::{Error, HistoryRecord, HistoryStore, OwnerScope, Result};

/// Read and parse a JSON file. A missing file yields `Ok(None)`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Serialize `value` and atomically replace `path` with it.
pub async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "json_file: create_dir_all failed");
                e
            })?;
        }
    }

    // Atomic write: temp file + rename
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await.map_err(|e| {
        warn!(temp_path = %temp_path.display(), error = %e, "json_file: File::create failed");
        e
    })?;
    file.write_all(&data).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&temp_path, path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "json_file: rename failed");
        e
    })?;

    debug!(path = %path.display(), size = data.len(), "json_file: write");
    Ok(())
}

/// History store persisting every scope into one JSON file.
///
/// Operations are serialized through an internal lock, so concurrent appends
/// from one process never lose each other's records.
#[derive(Debug)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    max_records: Option<usize>,
    lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_records: None,
            lock: Mutex::new(()),
        }
    }

    /// Keep at most `max` records per scope in the file.
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }
}

fn persistence(e: Error) -> Error {
    match e {
        Error::Persistence(_) => e,
        other => Error::Persistence(other.to_string()),
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn save(&self, record: &HistoryRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await.map_err(persistence)?;
        records.retain(|r| r.id != record.id);
        records.insert(0, record.clone());

        if let Some(max) = self.max_records {
            let mut kept_for_scope = 0usize;
            records.retain(|r| {
                if r.owner_scope != record.owner_scope {
                    return true;
                }
                kept_for_scope += 1;
                kept_for_scope <= max
            });
        }

        write_json_atomic(&self.path, &records)
            .await
            .map_err(persistence)
    }

    async fn load_recent(&self, scope: &OwnerScope, limit: usize) -> Result<Vec<HistoryRecord>> {
        let _guard = self.lock.lock().await;
        let mut scoped: Vec<HistoryRecord> = self
            .read_all()
            .await
            .map_err(persistence)?
            .into_iter()
            .filter(|r| &r.owner_scope == scope)
            .collect();
        scoped.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        scoped.truncate(limit);
        Ok(scoped)
    }

    async fn delete_all(&self, scope: &OwnerScope) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await.map_err(persistence)?;
        let before = records.len();
        records.retain(|r| &r.owner_scope != scope);
        if records.len() == before {
            return Ok(());
        }
        write_json_atomic(&self.path, &records)
            .await
            .map_err(persistence)
    }
}
