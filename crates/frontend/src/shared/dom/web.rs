use super::{AdditionCallback, DomHost};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord, Node};

/// [`DomHost`] поверх живого DOM браузера.
#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// DOM текущего окна; `None` вне браузера.
    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn collect_elements(list: web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl DomHost for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, root: Option<&Element>, selector: &str) -> Vec<Element> {
        let result = match root {
            Some(element) => element.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        match result {
            Ok(list) => collect_elements(list),
            Err(_) => {
                log::warn!("⚠️ Invalid selector `{selector}`");
                Vec::new()
            }
        }
    }

    fn descendants(&self, node: &Element) -> Vec<Element> {
        self.query_all(Some(node), "*")
    }

    fn matches(&self, node: &Element, selector: &str) -> bool {
        node.matches(selector).unwrap_or(false)
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn id(&self, node: &Element) -> String {
        node.id()
    }

    fn class_list(&self, node: &Element) -> Vec<String> {
        node.class_name()
            .split_whitespace()
            .map(String::from)
            .collect()
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn own_text(&self, node: &Element) -> String {
        let children = node.child_nodes();
        let mut text = String::new();
        for i in 0..children.length() {
            if let Some(child) = children.get(i) {
                if child.node_type() == Node::TEXT_NODE {
                    text.push_str(&child.text_content().unwrap_or_default());
                }
            }
        }
        text
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_visible(&self, node: &Element, visible: bool) {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            let display = if visible { "block" } else { "none" };
            let _ = html.style().set_property("display", display);
        }
    }

    fn is_visible(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlElement>()
            .and_then(|html| html.style().get_property_value("display").ok())
            .map(|display| display != "none")
            .unwrap_or(true)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn observe_additions(&self, node: &Element, callback: AdditionCallback<Element>) {
        let closure = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let mut added = Vec::new();
                for record in records.iter() {
                    if let Ok(record) = record.dyn_into::<MutationRecord>() {
                        added.extend(collect_elements(record.added_nodes()));
                    }
                }
                if !added.is_empty() {
                    callback(added);
                }
            },
        );

        let observer = match MutationObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                log::error!("❌ MutationObserver unavailable: {:?}", e);
                return;
            }
        };
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        if let Err(e) = observer.observe_with_options(node, &options) {
            log::error!("❌ Failed to observe section: {:?}", e);
            return;
        }
        // Observer lives for the page lifetime.
        closure.forget();
    }
}
