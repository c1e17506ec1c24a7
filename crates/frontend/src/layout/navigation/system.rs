//! NavigationSystem - конечный автомат над секциями.
//!
//! Все переходы идут через `navigate_to`: допуск (`can_load`), переключение
//! видимости, запись истории, отложенная очистка секции и загрузка данных.
//! Обработчики старых слоёв (`HandlerChain`) вызываются после перехода,
//! их ошибки только логируются.

use super::click::{parse_section_handler, HANDLER_ATTRIBUTES, SIDEBAR_LINK_SELECTOR};
use super::handlers::HandlerChain;
use super::loaders::{LoadError, LoaderRegistry};
use crate::shared::dom::DomHost;
use crate::shared::render_controller::RenderController;
use crate::shared::state::StateManager;
use crate::shared::timing::Scheduler;
use contracts::shared::runtime::RuntimeStatus;
use contracts::shared::sections::{section_loader_name, subtab_key, subtab_loader_name};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Top-level section panels.
pub const SECTION_SELECTOR: &str = ".section";
pub const SUB_TAB_CONTENT_SELECTOR: &str = ".sub-tab-content";
pub const SUB_NAV_BUTTON_SELECTOR: &str = ".sub-nav-btn";
pub const ACTIVE_CLASS: &str = "active";

/// Result of a cache-aware, admission-gated load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Loader ran; payload is now cached.
    Loaded(Value),
    /// Fresh cache entry, no loader call.
    Cached(Value),
    /// Key is loading or inside the debounce window.
    Rejected,
    /// No loader registered under the conventional name.
    NoLoader,
    /// The main tab element is not in the DOM.
    MissingTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Navigated(LoadOutcome),
    /// Admission refused; DOM and current section untouched.
    Rejected,
    /// Empty section id, or `refresh` with no current section.
    Invalid,
    /// `back` with fewer than two history entries.
    NoHistory,
}

#[derive(Clone)]
pub struct NavigationSystem<D: DomHost> {
    dom: D,
    state: StateManager,
    render: RenderController<D>,
    loaders: LoaderRegistry,
    legacy: HandlerChain,
    config_gaps: Rc<RefCell<BTreeSet<String>>>,
}

impl<D: DomHost> NavigationSystem<D> {
    pub fn new(
        dom: D,
        state: StateManager,
        render: RenderController<D>,
        loaders: LoaderRegistry,
    ) -> Self {
        Self {
            dom,
            state,
            render,
            loaders,
            legacy: HandlerChain::new(),
            config_gaps: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn render(&self) -> &RenderController<D> {
        &self.render
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    /// Handlers from earlier layers, run after every successful navigation.
    pub fn legacy_handlers(&self) -> &HandlerChain {
        &self.legacy
    }

    /// Installs section guards and starts the state sweeps.
    pub fn start(&self, scheduler: &dyn Scheduler) {
        self.render.setup_section_guards();
        self.state.start_sweeps(scheduler);
        log::info!("🚀 Navigation system started");
    }

    // ── Sections ─────────────────────────────────────────────────────────

    pub async fn navigate_to(&self, section: &str) -> Result<NavigationOutcome, LoadError> {
        let section = section.trim();
        if section.is_empty() {
            log::error!("❌ navigate_to called without a section id");
            return Ok(NavigationOutcome::Invalid);
        }
        if !self.state.can_load(section) {
            log::warn!("⚠️ Navigation to '{}' rejected", section);
            return Ok(NavigationOutcome::Rejected);
        }

        self.note_config_gap(section);
        self.activate_section(section);
        self.render
            .schedule_cleanup(section, self.state.config().cleanup_delay_ms);

        let loaded = self.load_section_data(section).await;

        if let Err(e) = self.legacy.run(section) {
            log::error!("❌ Legacy navigation handler: {}", e);
        }

        loaded.map(NavigationOutcome::Navigated)
    }

    fn activate_section(&self, section: &str) {
        for panel in self.dom.query_all(None, SECTION_SELECTOR) {
            self.dom.set_visible(&panel, false);
        }
        self.state.set_current_section(section);

        let links = self.dom.query_all(None, SIDEBAR_LINK_SELECTOR);
        for link in &links {
            self.dom.remove_class(link, ACTIVE_CLASS);
        }

        match self.dom.element_by_id(section) {
            Some(target) => self.dom.set_visible(&target, true),
            None => log::warn!("⚠️ Section element #{} not found", section),
        }

        if let Some(link) = links
            .iter()
            .find(|link| self.link_section(link).as_deref() == Some(section))
        {
            self.dom.add_class(link, ACTIVE_CLASS);
        }
        log::info!("🧭 Navigated to '{}'", section);
    }

    fn link_section(&self, link: &D::Node) -> Option<String> {
        HANDLER_ATTRIBUTES
            .iter()
            .filter_map(|name| self.dom.attribute(link, name))
            .find_map(|text| parse_section_handler(&text))
    }

    fn note_config_gap(&self, section: &str) {
        if self.render.is_registered(section) {
            return;
        }
        log::warn!("⚠️ Section '{}' has no content policy", section);
        self.config_gaps.borrow_mut().insert(section.to_string());
    }

    /// Ids navigated to that have no content policy, sorted.
    pub fn config_gaps(&self) -> Vec<String> {
        self.config_gaps.borrow().iter().cloned().collect()
    }

    pub async fn load_section_data(&self, section: &str) -> Result<LoadOutcome, LoadError> {
        self.load_keyed(section, &section_loader_name(section), section)
            .await
    }

    /// Cache, loader lookup, admission and the loading flag for `key`.
    /// `section` is cleaned after a successful load.
    async fn load_keyed(
        &self,
        key: &str,
        loader_name: &str,
        section: &str,
    ) -> Result<LoadOutcome, LoadError> {
        if let Some(data) = self.state.get_cache(key) {
            log::debug!("💾 Cache hit for '{}'", key);
            self.state.touch(key);
            return Ok(LoadOutcome::Cached(data));
        }
        let Some(loader) = self.loaders.get(loader_name) else {
            log::warn!("⚠️ No loader '{}' for '{}'", loader_name, key);
            self.state.touch(key);
            return Ok(LoadOutcome::NoLoader);
        };
        if !self.state.can_load(key) {
            log::warn!("⚠️ Load of '{}' rejected", key);
            return Ok(LoadOutcome::Rejected);
        }
        self.state.set_loading(key, true);

        match loader().await {
            Ok(data) => {
                self.render.clean_section(section);
                self.state.set_cache(key, data.clone());
                self.state.set_loading(key, false);
                log::debug!("✅ Loaded '{}'", key);
                Ok(LoadOutcome::Loaded(data))
            }
            Err(e) => {
                self.state.set_loading(key, false);
                log::error!("❌ {}", e);
                Err(e)
            }
        }
    }

    // ── Sub-tabs ─────────────────────────────────────────────────────────

    pub async fn switch_sub_tab(
        &self,
        main_tab: &str,
        sub_tab: &str,
    ) -> Result<LoadOutcome, LoadError> {
        let Some(main) = self.dom.element_by_id(main_tab) else {
            log::warn!("⚠️ Main tab #{} not found", main_tab);
            return Ok(LoadOutcome::MissingTarget);
        };
        let key = subtab_key(main_tab, sub_tab);

        for panel in self.dom.query_all(Some(&main), SUB_TAB_CONTENT_SELECTOR) {
            self.dom.set_visible(&panel, false);
            self.dom.remove_class(&panel, ACTIVE_CLASS);
        }
        let buttons = self.dom.query_all(Some(&main), SUB_NAV_BUTTON_SELECTOR);
        for button in &buttons {
            self.dom.remove_class(button, ACTIVE_CLASS);
        }

        match self.sub_tab_panel(&main, &key, sub_tab) {
            Some(target) => {
                self.dom.set_visible(&target, true);
                self.dom.add_class(&target, ACTIVE_CLASS);
            }
            None => log::warn!("⚠️ Sub-tab '{}' not found in #{}", sub_tab, main_tab),
        }

        let quoted = [format!("'{}'", sub_tab), format!("\"{}\"", sub_tab)];
        if let Some(button) = buttons.iter().find(|button| {
            self.dom.attribute(button, "data-subtab").as_deref() == Some(sub_tab)
                || self
                    .dom
                    .attribute(button, "onclick")
                    .map(|text| quoted.iter().any(|q| text.contains(q.as_str())))
                    .unwrap_or(false)
        }) {
            self.dom.add_class(button, ACTIVE_CLASS);
        }

        self.load_keyed(&key, &subtab_loader_name(main_tab, sub_tab), main_tab)
            .await
    }

    /// `#<main>-<sub>`, else `#<sub>`, searched only inside `main`.
    fn sub_tab_panel(&self, main: &D::Node, key: &str, sub_tab: &str) -> Option<D::Node> {
        let inside = self.dom.descendants(main);
        [key, sub_tab]
            .into_iter()
            .filter(|id| !id.is_empty())
            .find_map(|id| inside.iter().find(|node| self.dom.id(node) == id).cloned())
    }

    // ── History ──────────────────────────────────────────────────────────

    /// Drops the current section's cache entry and flag, then navigates to it.
    pub async fn refresh(&self) -> Result<NavigationOutcome, LoadError> {
        let Some(current) = self.state.current_section() else {
            log::warn!("⚠️ Nothing to refresh");
            return Ok(NavigationOutcome::Invalid);
        };
        self.state.clear_cache(Some(&current));
        self.state.reset_loading(Some(&current));
        log::info!("🔄 Refreshing '{}'", current);
        self.navigate_to(&current).await
    }

    /// Navigates to the second-to-last history entry. History is not popped.
    pub async fn back(&self) -> Result<NavigationOutcome, LoadError> {
        let Some(previous) = self.state.previous_section() else {
            log::debug!("back: history too short");
            return Ok(NavigationOutcome::NoHistory);
        };
        self.navigate_to(&previous).await
    }

    // ── Click interception ───────────────────────────────────────────────

    /// Section id encoded in the sidebar link containing `target`.
    /// `None` for clicks elsewhere or links without a navigation handler.
    pub fn handle_sidebar_click(&self, target: &D::Node) -> Option<String> {
        let link = self.dom.closest(target, SIDEBAR_LINK_SELECTOR)?;
        self.link_section(&link)
    }

    // ── Manual control ───────────────────────────────────────────────────

    pub fn reset_system(&self) -> usize {
        self.state.clear_cache(None);
        self.state.reset_loading(None);
        let removed = self.render.clean_all();
        log::info!("♻️ System reset, {} element(s) removed", removed);
        removed
    }

    pub fn status(&self) -> RuntimeStatus {
        RuntimeStatus {
            state: self.state.status(),
            policies: self.render.policies().clone(),
            config_gaps: self.config_gaps(),
        }
    }
}
