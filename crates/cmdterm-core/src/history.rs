//! History Store
//!
//! Bounded, append-only log of submitted command lines. When the bound is
//! reached the oldest entries are evicted first.

use chrono::Local;
use serde::Serialize;
use std::collections::VecDeque;

/// Timestamp layout of history entries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One submitted command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Text as the user submitted it (before any rewrite)
    pub command: String,
    /// Local submission time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl HistoryEntry {
    /// Entry stamped with the current local time
    #[must_use]
    pub fn now(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// FIFO-bounded history
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryStore {
    /// Create an empty store holding at most `capacity` entries (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting from the front past the bound
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Append `command` stamped with the current time
    pub fn record(&mut self, command: impl Into<String>) {
        self.append(HistoryEntry::now(command));
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    /// All retained entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of retained entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(store: &HistoryStore) -> Vec<&str> {
        store.iter().map(|e| e.command.as_str()).collect()
    }

    #[test]
    fn test_under_capacity_preserves_order() {
        let mut store = HistoryStore::new(50);
        for i in 1..=50 {
            store.record(format!("cmd{}", i));
        }
        assert_eq!(store.len(), 50);
        assert_eq!(store.iter().next().unwrap().command, "cmd1");
        assert_eq!(store.iter().last().unwrap().command, "cmd50");
    }

    #[test]
    fn test_fifo_eviction() {
        let mut store = HistoryStore::new(3);
        for cmd in ["a", "b", "c", "d", "e"] {
            store.record(cmd);
        }
        assert_eq!(commands(&store), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut store = HistoryStore::new(50);
        for cmd in ["pwd", "ls", "cd ..", "history"] {
            store.record(cmd);
        }
        let recent: Vec<_> = store.recent(2).map(|e| e.command.as_str()).collect();
        assert_eq!(recent, vec!["cd ..", "history"]);

        // asking for more than is stored returns everything
        assert_eq!(store.recent(10).count(), 4);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut store = HistoryStore::new(0);
        store.record("a");
        store.record("b");
        assert_eq!(commands(&store), vec!["b"]);
    }

    #[test]
    fn test_timestamp_format() {
        let entry = HistoryEntry::now("ls");
        assert_eq!(entry.timestamp.len(), "2025-01-01 00:00:00".len());
        assert!(chrono::NaiveDateTime::parse_from_str(&entry.timestamp, TIMESTAMP_FORMAT).is_ok());
    }
}
