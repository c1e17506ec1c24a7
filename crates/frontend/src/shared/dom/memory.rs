//! In-memory DOM tree.
//!
//! Used by tests and headless runs. Mutation records are queued on append and
//! delivered by [`MemoryDom::flush_mutations`], the same way a browser delivers
//! `MutationObserver` records after the current task.

use super::selector::{SelectorList, SelectorSubject};
use super::{AdditionCallback, DomHost};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    visible: bool,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            visible: true,
        }
    }
}

struct Arena {
    nodes: Vec<NodeData>,
    root: NodeId,
    observers: Vec<(NodeId, AdditionCallback<NodeId>)>,
    pending: Vec<NodeId>,
}

impl Arena {
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn is_connected(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.node(current).parent;
        }
        false
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = self.node(id).parent;
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.node(current).parent;
        }
        false
    }

    fn descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(id).children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push_str(&node.text);
        for child in &node.children {
            self.text_content(*child, out);
        }
    }
}

struct MemoryRef<'a> {
    arena: &'a Arena,
    id: NodeId,
}

impl SelectorSubject for MemoryRef<'_> {
    fn tag(&self) -> String {
        self.arena.node(self.id).tag.clone()
    }

    fn id(&self) -> String {
        self.arena
            .node(self.id)
            .attributes
            .get("id")
            .cloned()
            .unwrap_or_default()
    }

    fn has_class(&self, class: &str) -> bool {
        self.arena.node(self.id).classes.iter().any(|c| c == class)
    }

    fn attr(&self, name: &str) -> Option<String> {
        let node = self.arena.node(self.id);
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn parent_element(&self) -> Option<Self> {
        self.arena.node(self.id).parent.map(|id| MemoryRef {
            arena: self.arena,
            id,
        })
    }
}

#[derive(Clone)]
pub struct MemoryDom {
    inner: Rc<RefCell<Arena>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document with a `<body>` root.
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            inner: Rc::new(RefCell::new(Arena {
                nodes: vec![NodeData::new("body")],
                root,
                observers: Vec::new(),
                pending: Vec::new(),
            })),
        }
    }

    pub fn body(&self) -> NodeId {
        self.inner.borrow().root
    }

    /// Creates a `tag` element as the last child of `parent`.
    pub fn append(&self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let mut arena = self.inner.borrow_mut();
        let id = NodeId(arena.nodes.len());
        let mut data = NodeData::new(tag);
        data.parent = Some(parent);
        arena.nodes.push(data);
        arena.node_mut(parent).children.push(id);
        arena.pending.push(id);
        ElementBuilder { dom: self, node: id }
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        self.inner.borrow_mut().node_mut(node).text = text.to_string();
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut arena = self.inner.borrow_mut();
        let data = arena.node_mut(node);
        if name == "class" {
            data.classes = value.split_whitespace().map(String::from).collect();
        } else {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.borrow().node(node).children.clone()
    }

    /// Delivers queued addition records to observers.
    pub fn flush_mutations(&self) {
        let (pending, observers) = {
            let mut arena = self.inner.borrow_mut();
            (std::mem::take(&mut arena.pending), arena.observers.clone())
        };
        if pending.is_empty() {
            return;
        }
        for (target, callback) in observers {
            let added: Vec<NodeId> = {
                let arena = self.inner.borrow();
                pending
                    .iter()
                    .copied()
                    .filter(|id| arena.is_connected(*id) && arena.is_ancestor(target, *id))
                    .collect()
            };
            if !added.is_empty() {
                callback(added);
            }
        }
    }

    fn with_ref<R>(&self, node: NodeId, f: impl FnOnce(&MemoryRef<'_>) -> R) -> R {
        let arena = self.inner.borrow();
        f(&MemoryRef {
            arena: &arena,
            id: node,
        })
    }
}

pub struct ElementBuilder<'a> {
    dom: &'a MemoryDom,
    node: NodeId,
}

impl ElementBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.dom.set_attribute(self.node, "id", id);
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.dom
            .inner
            .borrow_mut()
            .node_mut(self.node)
            .classes
            .extend(class.split_whitespace().map(String::from));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.dom.set_text(self.node, text);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.dom.set_attribute(self.node, name, value);
        self
    }

    pub fn hidden(self) -> Self {
        self.dom.set_visible(&self.node, false);
        self
    }

    pub fn build(self) -> NodeId {
        self.node
    }
}

impl DomHost for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let arena = self.inner.borrow();
        let mut all = vec![arena.root];
        arena.descendants(arena.root, &mut all);
        all.into_iter()
            .find(|n| arena.node(*n).attributes.get("id").map(String::as_str) == Some(id))
    }

    fn query_all(&self, root: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(list) = SelectorList::parse(selector) else {
            return Vec::new();
        };
        let arena = self.inner.borrow();
        let mut candidates = Vec::new();
        match root {
            Some(node) => arena.descendants(*node, &mut candidates),
            None => {
                candidates.push(arena.root);
                arena.descendants(arena.root, &mut candidates);
            }
        }
        candidates
            .into_iter()
            .filter(|id| {
                list.matches(&MemoryRef {
                    arena: &arena,
                    id: *id,
                })
            })
            .collect()
    }

    fn descendants(&self, node: &NodeId) -> Vec<NodeId> {
        let arena = self.inner.borrow();
        let mut out = Vec::new();
        arena.descendants(*node, &mut out);
        out
    }

    fn matches(&self, node: &NodeId, selector: &str) -> bool {
        match SelectorList::parse(selector) {
            Some(list) => self.with_ref(*node, |r| list.matches(r)),
            None => false,
        }
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let list = SelectorList::parse(selector)?;
        let arena = self.inner.borrow();
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if list.matches(&MemoryRef {
                arena: &arena,
                id: current,
            }) {
                return Some(current);
            }
            cursor = arena.node(current).parent;
        }
        None
    }

    fn id(&self, node: &NodeId) -> String {
        self.with_ref(*node, |r| r.id())
    }

    fn class_list(&self, node: &NodeId) -> Vec<String> {
        self.inner.borrow().node(*node).classes.clone()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.inner.borrow().text_content(*node, &mut out);
        out
    }

    fn own_text(&self, node: &NodeId) -> String {
        self.inner.borrow().node(*node).text.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_ref(*node, |r| r.attr(name))
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut arena = self.inner.borrow_mut();
        let classes = &mut arena.node_mut(*node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.inner
            .borrow_mut()
            .node_mut(*node)
            .classes
            .retain(|c| c != class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.with_ref(*node, |r| r.has_class(class))
    }

    fn set_visible(&self, node: &NodeId, visible: bool) {
        self.inner.borrow_mut().node_mut(*node).visible = visible;
    }

    fn is_visible(&self, node: &NodeId) -> bool {
        self.inner.borrow().node(*node).visible
    }

    fn remove(&self, node: &NodeId) {
        let mut arena = self.inner.borrow_mut();
        if *node == arena.root {
            return;
        }
        if let Some(parent) = arena.node_mut(*node).parent.take() {
            arena.node_mut(parent).children.retain(|c| c != node);
        }
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.inner.borrow().is_connected(*node)
    }

    fn observe_additions(&self, node: &NodeId, callback: AdditionCallback<NodeId>) {
        self.inner.borrow_mut().observers.push((*node, callback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn sample() -> (MemoryDom, NodeId, NodeId) {
        let dom = MemoryDom::new();
        let body = dom.body();
        let sidebar = dom.append(body, "nav").class("sidebar").build();
        dom.append(sidebar, "a")
            .class("nav-link")
            .attr("onclick", "goTo('clientes')")
            .text("Clientes")
            .build();
        let section = dom.append(body, "section").id("financeiro").build();
        let resumo = dom.append(section, "div").id("financeiro-resumo").build();
        dom.append(resumo, "p").text("Saldo de ").build();
        dom.append(resumo, "span").text("estoque").build();
        (dom, section, resumo)
    }

    #[test]
    fn test_query_and_match() {
        let (dom, section, resumo) = sample();
        assert_eq!(dom.element_by_id("financeiro"), Some(section));
        assert_eq!(dom.query_all(None, ".sidebar a").len(), 1);
        assert_eq!(dom.query_all(Some(&section), "#financeiro-resumo"), vec![resumo]);
        assert!(dom.matches(&resumo, "div#financeiro-resumo"));
        assert!(dom.query_all(None, "div >").is_empty());
    }

    #[test]
    fn test_text_and_closest() {
        let (dom, section, resumo) = sample();
        assert_eq!(dom.text_content(&resumo), "Saldo de estoque");
        assert_eq!(dom.own_text(&resumo), "");
        let span = dom.descendants(&resumo)[1];
        assert_eq!(dom.closest(&span, "#financeiro-resumo"), Some(resumo));
        assert_eq!(dom.closest(&span, "section"), Some(section));
        assert_eq!(dom.closest(&span, ".sidebar"), None);
    }

    #[test]
    fn test_remove_disconnects_subtree() {
        let (dom, _section, resumo) = sample();
        let span = dom.descendants(&resumo)[1];
        dom.remove(&resumo);
        assert!(!dom.is_connected(&resumo));
        assert!(!dom.is_connected(&span));
        assert!(dom.element_by_id("financeiro-resumo").is_none());
    }

    #[test]
    fn test_observer_receives_additions_after_flush() {
        let (dom, section, _) = sample();
        dom.flush_mutations();

        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        dom.observe_additions(&section, Rc::new(move |added| s.set(s.get() + added.len())));

        dom.append(section, "div").class("card").build();
        dom.append(dom.body(), "div").build();
        assert_eq!(seen.get(), 0);
        dom.flush_mutations();
        assert_eq!(seen.get(), 1);
    }
}
