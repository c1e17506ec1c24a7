pub mod api_utils;
pub mod config;
pub mod dom;
pub mod icons;
pub mod render_controller;
pub mod state;
pub mod timing;
