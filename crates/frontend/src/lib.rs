pub mod app;
pub mod bindings;
pub mod layout;
pub mod shared;

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
pub fn start() {
    // `log` -> browser console
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("🌿 BIOMA frontend v{}", env!("CARGO_PKG_VERSION"));

    leptos::mount::mount_to_body(app::App);
}
