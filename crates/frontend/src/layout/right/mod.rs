pub mod right;
pub mod status_panel;

pub use right::Right;
pub use status_panel::StatusPanel;
