//! Render Controller - политика контента секций.
//!
//! Содержит:
//! - `policy` - статическая таблица разрешённых/запрещённых ключевых слов
//!   и защищённых контейнеров для каждой секции
//! - `controller` - проверка элементов, очистка секций, охранники на
//!   MutationObserver и синхронная сверка отрендеренного контента

pub mod controller;
pub mod policy;

pub use controller::{RemovalGranularity, RenderController};
pub use policy::{policy_for, policy_table};
