use contracts::shared::runtime::HistoryEntry;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Value,
    /// Unix time, milliseconds.
    pub timestamp: i64,
}

/// StateStore holds page-lifetime runtime state.
/// Only `StateManager` mutates it; everything else reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    pub current_section: Option<String>,
    pub loading: HashMap<String, bool>,
    pub last_load: HashMap<String, i64>,
    pub cache: HashMap<String, CacheEntry>,
    pub history: VecDeque<HistoryEntry>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.get(key).copied().unwrap_or(false)
    }

    pub fn loading_snapshot(&self) -> BTreeMap<String, bool> {
        self.loading.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    /// Cache keys, sorted.
    pub fn cache_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Last `n` history entries, oldest first.
    pub fn history_tail(&self, n: usize) -> Vec<HistoryEntry> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Section recorded immediately before the newest history entry.
    pub fn previous_section(&self) -> Option<&str> {
        let len = self.history.len();
        if len < 2 {
            return None;
        }
        self.history.get(len - 2).map(|e| e.section.as_str())
    }
}
