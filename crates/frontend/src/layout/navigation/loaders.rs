//! Реестр загрузчиков данных секций.
//!
//! Загрузчик находится по имени: `load<Section>` для секции и
//! `load<Main><Sub>` для под-вкладки (см. `contracts::shared::sections`).
//! Если в реестре имени нет, спрашиваем резолвер: в браузере это функции
//! страницы на `window` (`window.loadDashboard`, `window.loadFinanceiroResumo`).

use crate::shared::api_utils::api_url;
use contracts::shared::sections::{section_loader_name, subtab_loader_name, SectionId};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_net::http::Request;
use js_sys::{Function, Promise, Reflect};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load '{key}': {message}")]
pub struct LoadError {
    pub key: String,
    pub message: String,
}

impl LoadError {
    pub fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

pub type LoadFuture = LocalBoxFuture<'static, Result<Value, LoadError>>;
pub type Loader = Rc<dyn Fn() -> LoadFuture>;
/// Finds a loader by name outside the registry.
pub type LoaderResolver = Rc<dyn Fn(&str) -> Option<Loader>>;

#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: Rc<RefCell<HashMap<String, Loader>>>,
    resolver: Rc<RefCell<Option<LoaderResolver>>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under an explicit name, replacing any previous loader.
    pub fn register(&self, name: &str, loader: Loader) {
        self.loaders.borrow_mut().insert(name.to_string(), loader);
    }

    pub fn register_section(&self, section: &str, loader: Loader) {
        self.register(&section_loader_name(section), loader);
    }

    pub fn register_subtab(&self, main_tab: &str, sub_tab: &str, loader: Loader) {
        self.register(&subtab_loader_name(main_tab, sub_tab), loader);
    }

    /// Consulted by [`LoaderRegistry::get`] for names with no registered loader.
    pub fn set_resolver(&self, resolver: LoaderResolver) {
        *self.resolver.borrow_mut() = Some(resolver);
    }

    pub fn get(&self, name: &str) -> Option<Loader> {
        if let Some(loader) = self.loaders.borrow().get(name).cloned() {
            return Some(loader);
        }
        let resolver = self.resolver.borrow().clone()?;
        resolver(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaders.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with a `GET /api/<section>` loader for every known section.
    pub fn with_http_sections() -> Self {
        let registry = Self::new();
        for section in SectionId::ALL {
            registry.register_section(section.as_str(), http_section_loader(section.as_str()));
        }
        registry
    }
}

/// `GET /api/<section>`, JSON body becomes the cached payload.
pub fn http_section_loader(section: &str) -> Loader {
    let section = section.to_string();
    Rc::new(move || {
        let section = section.clone();
        async move {
            let url = api_url(&format!("/api/{}", section));
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|e| LoadError::new(&section, e.to_string()))?;
            if !response.ok() {
                return Err(LoadError::new(
                    &section,
                    format!("HTTP error: {}", response.status()),
                ));
            }
            response
                .json::<Value>()
                .await
                .map_err(|e| LoadError::new(&section, e.to_string()))
        }
        .boxed_local()
    })
}

/// Page function `window[name]` as a loader. A returned Promise is awaited;
/// the result is converted to JSON, `undefined` becomes `null`.
pub fn window_loader(name: &str) -> Option<Loader> {
    let window = web_sys::window()?;
    let function = Reflect::get(&window, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    let name = name.to_string();
    Some(Rc::new(move || {
        let function = function.clone();
        let name = name.clone();
        async move {
            let mut result = function
                .call0(&JsValue::NULL)
                .map_err(|e| LoadError::new(&name, js_error_message(&e)))?;
            if let Some(promise) = result.dyn_ref::<Promise>() {
                result = JsFuture::from(promise.clone())
                    .await
                    .map_err(|e| LoadError::new(&name, js_error_message(&e)))?;
            }
            if result.is_undefined() {
                return Ok(Value::Null);
            }
            serde_wasm_bindgen::from_value::<Value>(result)
                .map_err(|e| LoadError::new(&name, e.to_string()))
        }
        .boxed_local()
    }))
}

/// Message of a thrown JS value: `Error.message`, a plain string, or its debug form.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_register_by_convention() {
        let registry = LoaderRegistry::new();
        registry.register_section("clientes", Rc::new(|| async { Ok::<_, LoadError>(json!([])) }.boxed_local()));
        registry.register_subtab(
            "financeiro",
            "receitas",
            Rc::new(|| async { Ok::<_, LoadError>(json!({ "total": 10 })) }.boxed_local()),
        );

        assert_eq!(registry.names(), vec!["loadClientes", "loadFinanceiroReceitas"]);
        let loader = registry.get("loadFinanceiroReceitas").unwrap();
        assert_eq!(block_on(loader()), Ok(json!({ "total": 10 })));
        assert!(registry.get("loadEstoque").is_none());
    }

    #[test]
    fn test_resolver_fills_registry_gaps() {
        let registry = LoaderRegistry::new();
        registry.register_section("clientes", Rc::new(|| async { Ok::<_, LoadError>(json!("rust")) }.boxed_local()));
        let asked = Rc::new(RefCell::new(Vec::new()));
        let asked_in = asked.clone();
        registry.set_resolver(Rc::new(move |name: &str| -> Option<Loader> {
            asked_in.borrow_mut().push(name.to_string());
            (name == "loadFinanceiroResumo").then(|| -> Loader {
                Rc::new(|| async { Ok::<_, LoadError>(json!({ "saldo": 0 })) }.boxed_local())
            })
        }));

        assert_eq!(block_on(registry.get("loadClientes").unwrap()()), Ok(json!("rust")));
        let resumo = registry.get("loadFinanceiroResumo").unwrap();
        assert_eq!(block_on(resumo()), Ok(json!({ "saldo": 0 })));
        assert!(registry.get("loadEstoqueLista").is_none());
        assert_eq!(*asked.borrow(), vec!["loadFinanceiroResumo", "loadEstoqueLista"]);
    }

    #[test]
    fn test_http_registry_covers_all_sections() {
        let registry = LoaderRegistry::with_http_sections();
        assert_eq!(registry.names().len(), SectionId::ALL.len());
        assert!(registry.get("loadConfiguracoes").is_some());
    }
}
