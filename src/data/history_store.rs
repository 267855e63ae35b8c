/// Rolling result history - newest-first in memory, JSON snapshot on disk
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{Result, TrackerError};
use crate::types::RouletteResult;

/// Outcome of applying one candidate to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: bool,
    pub pruned: usize,
}

/// Ordered history of results, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: VecDeque<RouletteResult>,
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore::default()
    }

    /// Build from entries already ordered newest first.
    /// Timestamps are truncated to whole minutes, as stored on disk.
    pub fn from_entries(entries: Vec<RouletteResult>) -> Self {
        HistoryStore {
            entries: entries
                .into_iter()
                .map(RouletteResult::at_minute_precision)
                .collect(),
        }
    }

    /// Prepend `candidate` unless its id matches the current head.
    /// Only the head is compared; older entries are not searched.
    pub fn ingest(&mut self, candidate: RouletteResult) -> bool {
        let candidate = candidate.at_minute_precision();
        if let Some(head) = self.entries.front() {
            if head.id == candidate.id {
                debug!("Duplicate of head result {}", candidate.id);
                return false;
            }
        }

        self.entries.push_front(candidate);
        true
    }

    /// Drop every entry dated before `cutoff`, keeping the order of the rest.
    /// Returns the number of entries removed.
    pub fn prune(&mut self, cutoff: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries.retain(|r| r.iso_date >= cutoff);
        before - self.entries.len()
    }

    /// Ingest then prune as one step; nothing is pruned for a duplicate
    pub fn ingest_and_prune(&mut self, candidate: RouletteResult, cutoff: NaiveDate) -> IngestReport {
        if !self.ingest(candidate) {
            return IngestReport {
                accepted: false,
                pruned: 0,
            };
        }

        IngestReport {
            accepted: true,
            pruned: self.prune(cutoff),
        }
    }

    /// Copy of up to `limit` most recent entries, newest first
    pub fn snapshot(&self, limit: Option<usize>) -> Vec<RouletteResult> {
        let n = limit.unwrap_or(self.entries.len());
        self.entries.iter().take(n).cloned().collect()
    }

    /// Most recent result
    pub fn head(&self) -> Option<&RouletteResult> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical on-disk form: pretty JSON array, newest first
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Parse the on-disk form, reporting malformed input
    pub fn try_load(persisted: &str) -> Result<Self> {
        let entries: Vec<RouletteResult> = serde_json::from_str(persisted)
            .map_err(|e| TrackerError::CorruptSnapshot(e.to_string()))?;
        Ok(HistoryStore::from_entries(entries))
    }

    /// Parse the on-disk form; malformed input yields an empty history
    pub fn load(persisted: &str) -> Self {
        match HistoryStore::try_load(persisted) {
            Ok(store) => store,
            Err(e) => {
                warn!("Discarding unreadable history snapshot: {} ({})", e, e.error_code());
                HistoryStore::new()
            }
        }
    }
}

/// Thread-safe handle to the history.
///
/// The ingestion scheduler is the only writer. Readers copy what they
/// need under a short read lock; no lock is held across an await.
#[derive(Clone, Default)]
pub struct SharedHistory {
    store: Arc<RwLock<HistoryStore>>,
}

impl SharedHistory {
    pub fn new(store: HistoryStore) -> Self {
        SharedHistory {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn ingest_and_prune(&self, candidate: RouletteResult, cutoff: NaiveDate) -> IngestReport {
        let mut store = self.store.write().await;
        store.ingest_and_prune(candidate, cutoff)
    }

    pub async fn snapshot(&self, limit: Option<usize>) -> Vec<RouletteResult> {
        let store = self.store.read().await;
        store.snapshot(limit)
    }

    pub async fn head(&self) -> Option<RouletteResult> {
        let store = self.store.read().await;
        store.head().cloned()
    }

    pub async fn len(&self) -> usize {
        let store = self.store.read().await;
        store.len()
    }

    pub async fn serialize(&self) -> Result<String> {
        let store = self.store.read().await;
        store.serialize()
    }
}
