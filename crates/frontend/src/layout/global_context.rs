use contracts::shared::runtime::RuntimeStatus;
use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

const SECTION_PARAM: &str = "section";

/// Реактивное состояние оболочки. Рантайм навигации пишет сюда через
/// подписку на `sectionChange`, компоненты только читают.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active_section: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    pub right_open: RwSignal<bool>,
    pub status: RwSignal<Option<RuntimeStatus>>,
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active_section: RwSignal::new(None),
            left_open: RwSignal::new(true),
            right_open: RwSignal::new(false),
            status: RwSignal::new(None),
        }
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }

    pub fn toggle_right(&self) {
        self.right_open.update(|val| *val = !*val);
    }

    /// Section requested by `?section=` in the page URL.
    pub fn initial_section(&self) -> Option<String> {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        section_from_query(&search)
    }

    /// Keeps `?section=` in sync with the active section.
    pub fn init_router_integration(&self) {
        let this = *self;
        Effect::new(move |_| {
            let Some(section) = this.active_section.get() else {
                return;
            };
            let new_url = format!("?{}", section_query(&section));
            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search == new_url {
                return;
            }
            if let Some(history) = window().and_then(|w| w.history().ok()) {
                let _ = history.replace_state_with_url(
                    &wasm_bindgen::JsValue::NULL,
                    "",
                    Some(&new_url),
                );
            }
        });
    }
}

pub fn section_from_query(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params
        .get(SECTION_PARAM)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn section_query(section: &str) -> String {
    serde_qs::to_string(&HashMap::from([(SECTION_PARAM, section)])).unwrap_or_default()
}
