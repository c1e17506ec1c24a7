use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Запись истории навигации.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub section: String,
    /// Unix time, milliseconds.
    pub timestamp: i64,
    pub from: Option<String>,
}

impl HistoryEntry {
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
