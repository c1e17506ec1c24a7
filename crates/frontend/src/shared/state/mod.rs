//! Состояние клиентского рантайма.
//!
//! - `state_store` - хранилище (текущая секция, флаги загрузки, кэш, история)
//! - `state_manager` - допуск загрузок, TTL кэша, фоновые очистки, наблюдатели

pub mod state_manager;
pub mod state_store;

pub use state_manager::{Observer, StateManager, SECTION_CHANGE_EVENT};
pub use state_store::{CacheEntry, StateStore};
