//! Абстракция DOM для рантайма.
//!
//! Навигация и контроль рендера работают через [`DomHost`]: в браузере это
//! [`web::WebDom`] поверх `web-sys`, в тестах - `memory::MemoryDom`.

#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub mod selector;
pub mod web;

use std::rc::Rc;

#[cfg(test)]
pub use memory::{MemoryDom, NodeId};
pub use web::WebDom;

/// Callback receiving the element nodes added under an observed subtree.
pub type AdditionCallback<N> = Rc<dyn Fn(Vec<N>)>;

pub trait DomHost: Clone + 'static {
    type Node: Clone + PartialEq + 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Elements matching `selector` under `root` (whole document when `None`),
    /// in document order. An invalid selector yields no elements.
    fn query_all(&self, root: Option<&Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// All descendant elements of `node` in document order.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn matches(&self, node: &Self::Node, selector: &str) -> bool;

    /// Nearest ancestor-or-self matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn id(&self, node: &Self::Node) -> String;
    fn class_list(&self, node: &Self::Node) -> Vec<String>;

    /// Text of the node and all of its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Text of the node's direct text children only.
    fn own_text(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn set_visible(&self, node: &Self::Node, visible: bool);
    fn is_visible(&self, node: &Self::Node) -> bool;

    fn remove(&self, node: &Self::Node);
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Watches `node`'s subtree for added elements. Delivery is asynchronous:
    /// the callback fires after the mutating batch completes.
    fn observe_additions(&self, node: &Self::Node, callback: AdditionCallback<Self::Node>);
}
