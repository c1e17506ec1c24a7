pub mod history;
pub mod status;

pub use history::HistoryEntry;
pub use status::{RuntimeStatus, StateStatus};
