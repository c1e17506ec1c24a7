//! Рантайм страницы и точки входа для JS.
//!
//! Один экземпляр `NavigationSystem<WebDom>` на страницу, хранится в
//! thread-local. Inline-разметка и сторонние скрипты вызывают
//! `window.goTo`, `window.switchSubTab` и диагностические `window.bioma*`,
//! компоненты Leptos вызывают те же функции напрямую.
//!
//! `window.goTo`, установленный скриптами страницы до нас, не теряется: он
//! становится обработчиком старого слоя и вызывается после каждой навигации.
//! Загрузчики, которых нет в реестре, ищутся на `window` по имени.

use crate::layout::global_context::AppGlobalContext;
use crate::layout::navigation::{
    js_error_message, legacy_callback, window_loader, LoadError, LoaderRegistry, LoaderResolver,
    NavigationSystem,
};
use crate::shared::config::RuntimeConfig;
use crate::shared::dom::WebDom;
use crate::shared::render_controller::RenderController;
use crate::shared::state::{StateManager, SECTION_CHANGE_EVENT};
use crate::shared::timing::{BrowserScheduler, Clock, Scheduler, SystemClock};
use contracts::shared::sections::SectionId;
use js_sys::{Function, Reflect};
use leptos::prelude::Set;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;

#[derive(Clone)]
struct Runtime {
    nav: NavigationSystem<WebDom>,
    ctx: AppGlobalContext,
}

impl Runtime {
    fn publish_status(&self) {
        self.ctx.status.set(Some(self.nav.status()));
    }

    fn finish<T: Debug>(&self, operation: &str, result: Result<T, LoadError>) {
        match result {
            Ok(outcome) => log::debug!("{}: {:?}", operation, outcome),
            Err(e) => log::error!("❌ {}: {}", operation, e),
        }
        self.publish_status();
    }
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

fn runtime() -> Option<Runtime> {
    let runtime = RUNTIME.with(|r| r.borrow().clone());
    if runtime.is_none() {
        log::warn!("⚠️ Runtime is not started yet");
    }
    runtime
}

/// Builds the page runtime once the shell is mounted. A second call is a no-op.
pub fn boot(ctx: AppGlobalContext) {
    if RUNTIME.with(|r| r.borrow().is_some()) {
        return;
    }
    let Some(dom) = WebDom::from_window() else {
        log::error!("❌ No document, runtime not started");
        return;
    };

    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
    let state = StateManager::new(RuntimeConfig::load(), clock);
    let render = RenderController::new(dom.clone(), state.clone(), scheduler.clone());
    let nav = NavigationSystem::new(
        dom.clone(),
        state.clone(),
        render,
        LoaderRegistry::with_http_sections(),
    );
    let resolver: LoaderResolver = Rc::new(window_loader);
    nav.loaders().set_resolver(resolver);

    state.observe(
        SECTION_CHANGE_EVENT,
        Rc::new(move |data: &Value| -> Result<(), String> {
            let to = data
                .get("to")
                .and_then(Value::as_str)
                .ok_or("sectionChange without 'to'")?;
            ctx.active_section.set(Some(to.to_string()));
            Ok(())
        }),
    );

    nav.start(scheduler.as_ref());
    install_click_listener(&dom, nav.clone());
    adopt_page_go_to(&nav);
    expose_window_api();

    let runtime = Runtime { nav, ctx };
    runtime.publish_status();
    RUNTIME.with(|r| *r.borrow_mut() = Some(runtime));
    log::info!("✅ BIOMA runtime ready");

    let initial = ctx
        .initial_section()
        .unwrap_or_else(|| SectionId::Dashboard.as_str().to_string());
    go_to(initial);
}

/// Delegated sidebar click handling for the whole document.
fn install_click_listener(dom: &WebDom, nav: NavigationSystem<WebDom>) {
    let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
        let Some(target) = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        if let Some(section) = nav.handle_sidebar_click(&target) {
            event.prevent_default();
            go_to(section);
        }
    });
    if let Err(e) = dom
        .document()
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
    {
        log::error!("❌ Failed to install click listener: {:?}", e);
        return;
    }
    closure.forget();
}

/// Keeps a `window.goTo` defined before the runtime as the innermost
/// navigation handler. Its exceptions are logged by `navigate_to`.
fn adopt_page_go_to(nav: &NavigationSystem<WebDom>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(previous) = Reflect::get(&window, &JsValue::from_str("goTo"))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
    else {
        return;
    };
    nav.legacy_handlers().register(legacy_callback(move |section| {
        previous
            .call1(&JsValue::NULL, &JsValue::from_str(section))
            .map(|_| ())
            .map_err(|e| js_error_message(&e))
    }));
    log::info!("🔗 Existing window.goTo kept as legacy handler");
}

fn expose(name: &str, function: &JsValue) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = Reflect::set(&window, &JsValue::from_str(name), function) {
        log::error!("❌ Failed to expose window.{}: {:?}", name, e);
    }
}

fn expose_window_api() {
    let go = Closure::<dyn Fn(String)>::new(go_to);
    expose("goTo", go.as_ref());
    go.forget();

    let sub = Closure::<dyn Fn(String, String)>::new(switch_sub_tab);
    expose("switchSubTab", sub.as_ref());
    sub.forget();

    let unit_calls: [(&str, fn()); 5] = [
        ("biomaRefresh", refresh),
        ("biomaBack", back),
        ("biomaClearCache", clear_cache),
        ("biomaResetLoading", reset_loading),
        ("biomaResetSystem", reset_system),
    ];
    for (name, function) in unit_calls {
        let closure = Closure::<dyn Fn()>::new(function);
        expose(name, closure.as_ref());
        closure.forget();
    }

    let status = Closure::<dyn Fn() -> JsValue>::new(status_object);
    expose("biomaStatus", status.as_ref());
    status.forget();

    let status_text = Closure::<dyn Fn() -> String>::new(status_json);
    expose("biomaStatusJson", status_text.as_ref());
    status_text.forget();

    let clean = Closure::<dyn Fn(String) -> usize>::new(clean_section);
    expose("biomaCleanSection", clean.as_ref());
    clean.forget();

    let clean_all_closure = Closure::<dyn Fn() -> usize>::new(clean_all);
    expose("biomaCleanAll", clean_all_closure.as_ref());
    clean_all_closure.forget();
}

// ── Entry points ─────────────────────────────────────────────────────────

pub fn go_to(section: String) {
    let Some(rt) = runtime() else {
        return;
    };
    spawn_local(async move {
        let result = rt.nav.navigate_to(&section).await;
        rt.finish("goTo", result);
    });
}

pub fn switch_sub_tab(main_tab: String, sub_tab: String) {
    let Some(rt) = runtime() else {
        return;
    };
    spawn_local(async move {
        let result = rt.nav.switch_sub_tab(&main_tab, &sub_tab).await;
        rt.finish("switchSubTab", result);
    });
}

pub fn refresh() {
    let Some(rt) = runtime() else {
        return;
    };
    spawn_local(async move {
        let result = rt.nav.refresh().await;
        rt.finish("refresh", result);
    });
}

pub fn back() {
    let Some(rt) = runtime() else {
        return;
    };
    spawn_local(async move {
        let result = rt.nav.back().await;
        rt.finish("back", result);
    });
}

pub fn clear_cache() {
    if let Some(rt) = runtime() {
        rt.nav.state().clear_cache(None);
        log::info!("🗑️ Cache cleared");
        rt.publish_status();
    }
}

pub fn reset_loading() {
    if let Some(rt) = runtime() {
        rt.nav.state().reset_loading(None);
        log::info!("🔓 Loading flags reset");
        rt.publish_status();
    }
}

pub fn reset_system() {
    if let Some(rt) = runtime() {
        rt.nav.reset_system();
        rt.publish_status();
    }
}

pub fn clean_section(section: String) -> usize {
    runtime()
        .map(|rt| rt.nav.render().clean_section(&section))
        .unwrap_or(0)
}

pub fn clean_all() -> usize {
    runtime().map(|rt| rt.nav.render().clean_all()).unwrap_or(0)
}

/// Pretty JSON of the runtime status; also logged.
pub fn status_json() -> String {
    let Some(rt) = runtime() else {
        return "null".to_string();
    };
    rt.nav.state().debug();
    rt.publish_status();
    serde_json::to_string_pretty(&rt.nav.status()).unwrap_or_else(|e| {
        log::error!("❌ Failed to serialize status: {}", e);
        "null".to_string()
    })
}

/// Runtime status as a plain JS object for the devtools console.
pub fn status_object() -> JsValue {
    let Some(rt) = runtime() else {
        return JsValue::NULL;
    };
    rt.publish_status();
    serde_wasm_bindgen::to_value(&rt.nav.status()).unwrap_or_else(|e| {
        log::error!("❌ Failed to convert status: {}", e);
        JsValue::NULL
    })
}
