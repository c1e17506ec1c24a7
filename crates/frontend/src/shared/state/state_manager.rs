//! StateManager - единственная точка записи в `StateStore`.
//!
//! Отвечает за:
//! - допуск загрузок (`can_load`: флаг загрузки + окно debounce)
//! - кэш с TTL и ленивым вытеснением
//! - фоновое восстановление "зависших" флагов и очистку кэша
//! - простую подписку на события (`sectionChange`)
//!
//! Ни одна операция не паникует и не возвращает ошибку: отсутствующие ключи
//! дают `false` / `None` / no-op.

use super::state_store::{CacheEntry, StateStore};
use crate::shared::config::RuntimeConfig;
use crate::shared::timing::{Clock, Scheduler};
use contracts::shared::runtime::{HistoryEntry, StateStatus};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const SECTION_CHANGE_EVENT: &str = "sectionChange";

const STATUS_HISTORY_TAIL: usize = 10;

/// Subscriber callback. An `Err` is logged and does not stop other subscribers.
pub type Observer = Rc<dyn Fn(&Value) -> Result<(), String>>;

struct Inner {
    store: RefCell<StateStore>,
    observers: RefCell<HashMap<String, Vec<Observer>>>,
    config: RuntimeConfig,
    clock: Rc<dyn Clock>,
}

#[derive(Clone)]
pub struct StateManager {
    inner: Rc<Inner>,
}

impl StateManager {
    pub fn new(config: RuntimeConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(Inner {
                store: RefCell::new(StateStore::new()),
                observers: RefCell::new(HashMap::new()),
                config,
                clock,
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn now_ms(&self) -> i64 {
        self.inner.clock.now_ms()
    }

    // ── Section ──────────────────────────────────────────────────────────

    pub fn current_section(&self) -> Option<String> {
        self.inner.store.borrow().current_section.clone()
    }

    /// Records a section change and notifies `sectionChange` subscribers.
    /// An empty id is ignored.
    pub fn set_current_section(&self, id: &str) {
        if id.trim().is_empty() {
            return;
        }
        let now = self.now_ms();
        let limit = self.inner.config.history_limit.max(1);

        let from = {
            let mut store = self.inner.store.borrow_mut();
            let from = store.current_section.replace(id.to_string());
            store.history.push_back(HistoryEntry {
                section: id.to_string(),
                timestamp: now,
                from: from.clone(),
            });
            while store.history.len() > limit {
                store.history.pop_front();
            }
            from
        };

        log::debug!("📍 Section: {:?} -> '{}'", from, id);
        self.notify(SECTION_CHANGE_EVENT, &json!({ "from": from, "to": id }));
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.store.borrow().history.iter().cloned().collect()
    }

    pub fn previous_section(&self) -> Option<String> {
        self.inner
            .store
            .borrow()
            .previous_section()
            .map(str::to_string)
    }

    // ── Loading flags ────────────────────────────────────────────────────

    pub fn is_loading(&self, key: &str) -> bool {
        self.inner.store.borrow().is_loading(key)
    }

    /// Setting `true` also stamps the key's last-load time.
    pub fn set_loading(&self, key: &str, loading: bool) {
        let now = self.now_ms();
        let mut store = self.inner.store.borrow_mut();
        store.loading.insert(key.to_string(), loading);
        if loading {
            store.last_load.insert(key.to_string(), now);
        }
    }

    /// Stamps the key's last-load time without touching its flag. Used when a
    /// navigation is served without a loader call.
    pub fn touch(&self, key: &str) {
        let now = self.now_ms();
        self.inner
            .store
            .borrow_mut()
            .last_load
            .insert(key.to_string(), now);
    }

    /// Admission gate. Callers must follow a `true` with `set_loading(key, true)`
    /// before any `.await`.
    pub fn can_load(&self, key: &str) -> bool {
        let store = self.inner.store.borrow();
        if store.is_loading(key) {
            log::debug!("⏳ '{}' is already loading", key);
            return false;
        }
        if let Some(last) = store.last_load.get(key) {
            // A clock stepping backwards must not extend the window.
            let elapsed = self.now_ms() - last;
            if (0..self.inner.config.debounce_ms).contains(&elapsed) {
                log::debug!("⏱️ '{}' is inside the debounce window", key);
                return false;
            }
        }
        true
    }

    /// Clears one flag, or every flag when `key` is `None`.
    pub fn reset_loading(&self, key: Option<&str>) {
        let mut store = self.inner.store.borrow_mut();
        match key {
            Some(key) => {
                store.loading.insert(key.to_string(), false);
            }
            None => store.loading.values_mut().for_each(|v| *v = false),
        }
    }

    // ── Cache ────────────────────────────────────────────────────────────

    /// Fresh cached payload; an expired entry is evicted and reported absent.
    pub fn get_cache(&self, key: &str) -> Option<Value> {
        let now = self.now_ms();
        let ttl = self.inner.config.cache_ttl_ms;
        let mut store = self.inner.store.borrow_mut();
        let entry = store.cache.get(key)?;
        if now - entry.timestamp <= ttl {
            return Some(entry.data.clone());
        }
        store.cache.remove(key);
        log::debug!("🗑️ Cache entry '{}' expired", key);
        None
    }

    pub fn set_cache(&self, key: &str, data: Value) {
        let timestamp = self.now_ms();
        self.inner
            .store
            .borrow_mut()
            .cache
            .insert(key.to_string(), CacheEntry { data, timestamp });
    }

    /// Clears one entry, or the whole cache when `key` is `None`.
    pub fn clear_cache(&self, key: Option<&str>) {
        let mut store = self.inner.store.borrow_mut();
        match key {
            Some(key) => {
                store.cache.remove(key);
            }
            None => store.cache.clear(),
        }
    }

    // ── Sweeps ───────────────────────────────────────────────────────────

    /// Force-resets flags that stayed `true` for `stale_after_ms` or longer.
    /// Returns the recovered keys, sorted.
    pub fn sweep_stale_flags(&self) -> Vec<String> {
        let now = self.now_ms();
        let stale_after = self.inner.config.stale_after_ms;
        let mut store = self.inner.store.borrow_mut();

        let mut stale: Vec<String> = store
            .loading
            .iter()
            .filter(|(_, active)| **active)
            .filter(|(key, _)| match store.last_load.get(*key) {
                Some(last) => now < *last || now - last >= stale_after,
                None => true,
            })
            .map(|(key, _)| key.clone())
            .collect();
        stale.sort();

        for key in &stale {
            store.loading.insert(key.clone(), false);
            log::warn!("🧹 Loading flag '{}' was stuck, reset", key);
        }
        stale
    }

    /// Drops expired cache entries; returns how many were removed.
    pub fn purge_expired_cache(&self) -> usize {
        let now = self.now_ms();
        let ttl = self.inner.config.cache_ttl_ms;
        let mut store = self.inner.store.borrow_mut();
        let before = store.cache.len();
        store.cache.retain(|_, entry| now - entry.timestamp <= ttl);
        let removed = before - store.cache.len();
        if removed > 0 {
            log::debug!("🧹 Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Starts both periodic sweeps for the page lifetime.
    pub fn start_sweeps(&self, scheduler: &dyn Scheduler) {
        let manager = self.clone();
        scheduler.schedule_every(
            self.inner.config.stale_sweep_interval_ms,
            Rc::new(move || {
                manager.sweep_stale_flags();
            }),
        );
        let manager = self.clone();
        scheduler.schedule_every(
            self.inner.config.cache_sweep_interval_ms,
            Rc::new(move || {
                manager.purge_expired_cache();
            }),
        );
        log::info!("🔁 State sweeps started");
    }

    // ── Observers ────────────────────────────────────────────────────────

    pub fn observe(&self, event: &str, callback: Observer) {
        self.inner
            .observers
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(callback);
    }

    /// Calls every subscriber of `event`. Failures are logged per subscriber.
    pub(crate) fn notify(&self, event: &str, data: &Value) {
        let subscribers = self
            .inner
            .observers
            .borrow()
            .get(event)
            .cloned()
            .unwrap_or_default();
        for (index, callback) in subscribers.iter().enumerate() {
            if let Err(e) = callback(data) {
                log::error!("❌ Observer #{} of '{}' failed: {}", index, event, e);
            }
        }
    }

    // ── Diagnostics ──────────────────────────────────────────────────────

    pub fn status(&self) -> StateStatus {
        let store = self.inner.store.borrow();
        StateStatus {
            current_section: store.current_section.clone(),
            loading: store.loading_snapshot(),
            cache_keys: store.cache_keys(),
            history_len: store.history.len(),
            history_tail: store.history_tail(STATUS_HISTORY_TAIL),
        }
    }

    pub fn debug(&self) {
        match serde_json::to_string_pretty(&self.status()) {
            Ok(json) => log::info!("🔍 StateManager status:\n{}", json),
            Err(e) => log::error!("❌ Failed to serialize status: {}", e),
        }
    }
}
