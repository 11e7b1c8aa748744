use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::result::GenerationResult;

/// Number of generations kept in the ledger
pub const HISTORY_CAPACITY: usize = 10;

/// A past (objective, result) pair. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    id: Uuid,
    timestamp: DateTime<Utc>,
    objective: String,
    result: GenerationResult,
}

impl HistoryEntry {
    pub fn new(objective: String, result: GenerationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            objective,
            result,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }
}

/// Bounded, newest-first log of successful generations
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends the entry, evicting the oldest ones beyond capacity
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: Uuid) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
