//! [`HostNode`] implementation for the in-memory tree.
//!
//! Every method takes its `RefCell` borrow for the duration of one statement,
//! so a handle may be passed as both sides of a reconcile call.

use std::rc::Rc;

use log::warn;

use super::{Behavior, NodeInner, NodeRef};
use crate::host::{AttrName, HostNode, LiveFlag, NodeType};

impl HostNode for NodeRef {
    type Behavior = Behavior;

    fn node_type(&self) -> NodeType {
        self.borrow().content().node_type()
    }

    fn tag_name(&self) -> Option<String> {
        self.borrow().element().map(|e| e.name().to_string())
    }

    fn content(&self) -> Option<String> {
        self.borrow().content().value().map(str::to_string)
    }

    fn set_content(&self, value: &str) {
        self.borrow_mut().content_mut().set_value(value);
    }

    fn child_count(&self) -> usize {
        self.borrow().child_count()
    }

    fn child_at(&self, index: usize) -> Option<Self> {
        self.borrow().child(index).cloned()
    }

    fn parent(&self) -> Option<Self> {
        self.borrow().parent().upgrade()
    }

    fn append_child(&self, child: &Self) {
        NodeInner::add_child_to_ref(self, child.clone());
    }

    fn insert_before(&self, child: &Self, reference: &Self) {
        if Rc::ptr_eq(child, reference) {
            return;
        }
        NodeInner::detach(child);
        match NodeInner::index_of(self, reference) {
            Some(index) => NodeInner::add_child_at_to_ref(self, index, child.clone()),
            None => {
                warn!(
                    "insert_before: reference node {} is not a child of {}; appending",
                    reference.borrow().id(),
                    self.borrow().id()
                );
                NodeInner::add_child_to_ref(self, child.clone());
            }
        }
    }

    fn remove_child(&self, child: &Self) {
        if let Some(index) = NodeInner::index_of(self, child) {
            NodeInner::remove_child_to_ref(self, index);
        }
    }

    fn replace_child(&self, new_child: &Self, old_child: &Self) {
        if Rc::ptr_eq(new_child, old_child) {
            return;
        }
        NodeInner::detach(new_child);
        if let Some(index) = NodeInner::index_of(self, old_child) {
            NodeInner::replace_child_to_ref(self, index, new_child.clone());
        }
    }

    fn attribute_names(&self) -> Vec<AttrName> {
        self.borrow()
            .element()
            .map(|e| e.attributes().keys().cloned().collect())
            .unwrap_or_default()
    }

    fn attribute(&self, name: &AttrName) -> Option<String> {
        self.borrow()
            .element()
            .and_then(|e| e.attribute(name))
            .map(str::to_string)
    }

    fn set_attribute(&self, name: &AttrName, value: &str) {
        if let Some(e) = self.borrow_mut().element_mut() {
            e.set_attribute(name.clone(), value.to_string());
        }
    }

    fn remove_attribute(&self, name: &AttrName) {
        if let Some(e) = self.borrow_mut().element_mut() {
            e.remove_attribute(name);
        }
    }

    fn has_attribute(&self, name: &AttrName) -> bool {
        self.borrow()
            .element()
            .is_some_and(|e| e.attributes().contains_key(name))
    }

    fn live_value(&self) -> String {
        self.borrow()
            .element()
            .map(|e| e.live().value.clone())
            .unwrap_or_default()
    }

    fn set_live_value(&self, value: &str) {
        if let Some(e) = self.borrow_mut().element_mut() {
            e.live_mut().value = value.to_string();
        }
    }

    fn live_flag(&self, flag: LiveFlag) -> bool {
        self.borrow().element().is_some_and(|e| e.live().flag(flag))
    }

    fn set_live_flag(&self, flag: LiveFlag, value: bool) {
        if let Some(e) = self.borrow_mut().element_mut() {
            e.live_mut().set_flag(flag, value);
        }
    }

    fn behavior(&self, name: &str) -> Option<Behavior> {
        self.borrow()
            .element()
            .and_then(|e| e.get_behavior(name))
            .cloned()
    }

    fn set_behavior(&self, name: &str, handler: Option<Behavior>) {
        if let Some(e) = self.borrow_mut().element_mut() {
            e.set_behavior(name, handler);
        }
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }

    fn is_same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }

    fn label(&self) -> String {
        let node = self.borrow();
        let id = node.id();
        match node.element() {
            Some(e) => format!("<{}>#{}", e.name(), id),
            None => format!("{:?}#{}", node.content().node_type(), id).to_lowercase(),
        }
    }
}
