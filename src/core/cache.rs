//! Narrative Cache: generate-once-forever store
//!
//! Key invariant: at most one generation per identity, even under concurrent
//! first requests. A per-identity async lock guards check → generate →
//! persist; the store itself is rewritten wholesale on every new entry.
//!
//! Whole-file rewrites assume station cardinality in the low thousands.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use tempfile::NamedTempFile;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::types::{CacheError, NarrativeReason, NarrativeRecord, NarrativeResult};

/// Persisted mapping from exact station identity to narrative
#[derive(Debug)]
pub struct NarrativeCache {
    path: PathBuf,
    records: RwLock<BTreeMap<String, NarrativeRecord>>,
    generation_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl NarrativeCache {
    /// Empty cache that will persist to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::with_records(path.into(), BTreeMap::new())
    }

    /// Load the store. Any failure degrades to an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match read_records(&path) {
            Ok(records) => {
                info!(path = %path.display(), entries = records.len(), "Loaded narrative cache");
                records
            }
            Err(ReadFailure::Missing) => {
                info!(path = %path.display(), "No narrative cache yet, starting empty");
                BTreeMap::new()
            }
            Err(ReadFailure::Invalid(reason)) => {
                warn!(path = %path.display(), %reason, "Narrative cache unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self::with_records(path, records)
    }

    fn with_records(path: PathBuf, records: BTreeMap<String, NarrativeRecord>) -> Self {
        Self {
            path,
            records: RwLock::new(records),
            generation_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Exact, case-sensitive lookup
    pub async fn get(&self, identity: &str) -> Option<NarrativeRecord> {
        self.records.read().await.get(identity).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Return the stored record, or run `generate` once and persist its output.
    ///
    /// Callers racing on the same identity wait on one lock; the loser sees
    /// the winner's record. If persisting fails the record is served but not
    /// kept, so the next request generates again.
    pub async fn get_or_generate<F, Fut>(&self, identity: &str, generate: F) -> NarrativeResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = NarrativeRecord>,
    {
        if let Some(record) = self.get(identity).await {
            debug!(station = %identity, "Narrative cache hit");
            return NarrativeResult::new(record, NarrativeReason::R101_CACHE_HIT);
        }

        let lock = self.generation_lock(identity);
        let _guard = lock.lock().await;

        // Another request may have finished while we waited
        if let Some(record) = self.get(identity).await {
            debug!(station = %identity, "Narrative generated by concurrent request");
            return NarrativeResult::new(record, NarrativeReason::R101_CACHE_HIT);
        }

        let record = generate().await;

        match self.persist(identity, record.clone()).await {
            Ok(()) => {
                let reason = if record.is_ai_generated {
                    NarrativeReason::R103_GENERATED_POLISHED
                } else {
                    NarrativeReason::R102_GENERATED
                };
                info!(station = %identity, reason = reason.code(), "Narrative stored");
                NarrativeResult::new(record, reason)
            }
            Err(e) => {
                error!(station = %identity, error = %e, "Narrative cache write failed");
                NarrativeResult::new(record, NarrativeReason::R105_PERSIST_FAILED)
            }
        }
    }

    fn generation_lock(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .generation_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Insert and rewrite the whole store. The entry is dropped again if the
    /// write fails.
    async fn persist(&self, identity: &str, record: NarrativeRecord) -> Result<(), CacheError> {
        let mut records = self.records.write().await;
        records.insert(identity.to_string(), record);

        if let Err(e) = write_records(&self.path, &records) {
            records.remove(identity);
            return Err(e);
        }
        Ok(())
    }
}

enum ReadFailure {
    Missing,
    Invalid(String),
}

fn read_records(path: &Path) -> Result<BTreeMap<String, NarrativeRecord>, ReadFailure> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ReadFailure::Missing),
        Err(e) => return Err(ReadFailure::Invalid(e.to_string())),
    };

    let raw: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&json).map_err(|e| ReadFailure::Invalid(e.to_string()))?;

    let mut records = BTreeMap::new();
    for (identity, value) in raw {
        if !value.is_object() {
            warn!(station = %identity, "Skipping non-object narrative cache entry");
            continue;
        }
        match serde_json::from_value::<NarrativeRecord>(value) {
            Ok(record) => {
                records.insert(identity, record);
            }
            Err(e) => warn!(station = %identity, error = %e, "Skipping malformed narrative cache entry"),
        }
    }
    Ok(records)
}

/// Temp file in the target directory, then atomic rename over the store
fn write_records(path: &Path, records: &BTreeMap<String, NarrativeRecord>) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, records)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| CacheError::Io(e.error))?;
    Ok(())
}
