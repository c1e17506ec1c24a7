use super::history::HistoryEntry;
use crate::shared::content_policy::SectionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Снимок менеджера состояния для диагностики.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateStatus {
    pub current_section: Option<String>,
    pub loading: BTreeMap<String, bool>,
    pub cache_keys: Vec<String>,
    pub history_len: usize,
    pub history_tail: Vec<HistoryEntry>,
}

impl StateStatus {
    pub fn loading_keys(&self) -> Vec<&str> {
        self.loading
            .iter()
            .filter(|(_, active)| **active)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// Полный снимок рантайма: состояние, таблица политик и пробелы конфигурации.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeStatus {
    pub state: StateStatus,
    pub policies: BTreeMap<String, SectionPolicy>,
    pub config_gaps: Vec<String>,
}
