//! Content types for tree nodes.
//!
//! This module provides `NodeContent`, which represents the content of a render
//! tree node: an element (tag, attributes, live state, behaviors), a text leaf
//! or a comment leaf.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;

use super::live::{Behavior, LiveState};
use crate::host::{AttrName, NodeType};

/// Represents the content of a render tree node.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// An element with a tag name and attributes.
    Element(Element),
    /// Text content.
    Text(String),
    /// A comment.
    Comment(String),
}

impl NodeContent {
    /// Returns the node type of this content.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeContent::Element(_) => NodeType::Element,
            NodeContent::Text(_) => NodeType::Text,
            NodeContent::Comment(_) => NodeType::Comment,
        }
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, NodeContent::Element(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the content value of a text or comment node.
    pub fn value(&self) -> Option<&str> {
        match self {
            NodeContent::Text(s) | NodeContent::Comment(s) => Some(s),
            NodeContent::Element(_) => None,
        }
    }

    /// Replaces the content value of a text or comment node.
    ///
    /// Does nothing for elements.
    pub fn set_value(&mut self, value: &str) {
        match self {
            NodeContent::Text(s) | NodeContent::Comment(s) => {
                s.clear();
                s.push_str(value);
            }
            NodeContent::Element(_) => {}
        }
    }
}

/// An element: tag name, namespaced attributes, live state and behaviors.
///
/// Attributes and live state are independent channels. The live state is
/// seeded from the attributes when the element is created and afterwards only
/// changes through [`Element::live_mut`].
#[derive(Debug, Clone)]
pub struct Element {
    /// The tag name as written (e.g., "div", "svg:rect").
    name: String,
    /// Attributes keyed by (namespace, local name).
    attributes: BTreeMap<AttrName, String>,
    /// Live form-control state.
    live: LiveState,
    /// Bound behaviors keyed by name.
    behaviors: FxHashMap<String, Behavior>,
}

impl Element {
    /// Creates an element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, BTreeMap::new())
    }

    /// Creates an element with the given attributes, seeding live state from them.
    pub fn with_attributes(name: impl Into<String>, attributes: BTreeMap<AttrName, String>) -> Self {
        let live = LiveState::from_attributes(&attributes);
        Element {
            name: name.into(),
            attributes,
            live,
            behaviors: FxHashMap::default(),
        }
    }

    /// Builder-style attribute setter in no namespace.
    ///
    /// Re-seeds the live state, so it is meant for construction only.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(AttrName::local(name), value.to_string());
        self.live = LiveState::from_attributes(&self.attributes);
        self
    }

    /// Builder-style behavior binding.
    pub fn behavior(mut self, name: &str, handler: Behavior) -> Self {
        self.behaviors.insert(name.to_string(), handler);
        self
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &BTreeMap<AttrName, String> {
        &self.attributes
    }

    /// Returns an attribute value.
    pub fn attribute(&self, name: &AttrName) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns an attribute value in no namespace.
    pub fn local_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(&AttrName::local(name))
    }

    /// Sets an attribute value.
    pub fn set_attribute(&mut self, name: AttrName, value: String) {
        self.attributes.insert(name, value);
    }

    /// Removes an attribute, returning its old value.
    pub fn remove_attribute(&mut self, name: &AttrName) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns the live state.
    pub fn live(&self) -> &LiveState {
        &self.live
    }

    /// Returns a mutable reference to the live state.
    pub fn live_mut(&mut self) -> &mut LiveState {
        &mut self.live
    }

    /// Returns the behavior bound under `name`.
    pub fn get_behavior(&self, name: &str) -> Option<&Behavior> {
        self.behaviors.get(name)
    }

    /// Binds or clears the behavior under `name`.
    pub fn set_behavior(&mut self, name: &str, handler: Option<Behavior>) {
        match handler {
            Some(handler) => {
                self.behaviors.insert(name.to_string(), handler);
            }
            None => {
                self.behaviors.remove(name);
            }
        }
    }

    /// Returns the number of bound behaviors.
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {}={}", name, value)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kinds() {
        let elem = NodeContent::Element(Element::new("div"));
        let text = NodeContent::Text("hello".to_string());
        let comment = NodeContent::Comment("note".to_string());

        assert!(elem.is_element());
        assert_eq!(elem.node_type(), NodeType::Element);
        assert_eq!(text.node_type(), NodeType::Text);
        assert_eq!(comment.node_type(), NodeType::Comment);
        assert_eq!(elem.value(), None);
        assert_eq!(text.value(), Some("hello"));
        assert_eq!(comment.value(), Some("note"));
    }

    #[test]
    fn test_set_value_ignores_elements() {
        let mut text = NodeContent::Text("a".to_string());
        text.set_value("b");
        assert_eq!(text.value(), Some("b"));

        let mut elem = NodeContent::Element(Element::new("p"));
        elem.set_value("b");
        assert_eq!(elem.value(), None);
    }

    #[test]
    fn test_builder_seeds_live_state() {
        let input = Element::new("input")
            .attr("value", "42")
            .attr("checked", "");
        assert_eq!(input.live().value, "42");
        assert!(input.live().checked);
        assert!(!input.live().disabled);
    }

    #[test]
    fn test_attribute_writes_do_not_touch_live_state() {
        let mut input = Element::new("input").attr("value", "1");
        input.set_attribute(AttrName::local("value"), "2".to_string());
        assert_eq!(input.local_attribute("value"), Some("2"));
        assert_eq!(input.live().value, "1");
    }

    #[test]
    fn test_behaviors() {
        let mut elem = Element::new("button").behavior("onclick", Behavior::new(|_| {}));
        assert!(elem.get_behavior("onclick").is_some());
        elem.set_behavior("onclick", None);
        assert!(elem.get_behavior("onclick").is_none());
        assert_eq!(elem.behavior_count(), 0);
    }

    #[test]
    fn test_display_sorted() {
        let elem = Element::new("a").attr("title", "t").attr("href", "/x");
        assert_eq!(elem.to_string(), "a { href=/x title=t }");
    }
}
