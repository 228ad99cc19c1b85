//! The host tree interface consumed by the reconciler.
//!
//! The reconciler never owns node storage. Everything it needs from a tree
//! goes through [`HostNode`], which is implemented for the in-memory
//! [`NodeRef`](crate::node::NodeRef) tree and can be implemented for any other
//! handle-based tree (a real DOM binding, a terminal UI, a test double).
//!
//! Handles are cheap to clone and mutation goes through `&self`, the way DOM
//! handles behave. Implementations must not hold interior borrows across
//! calls, since the reconciler may pass the same handle as both the new and
//! the old node.

use std::fmt;

use crate::constants::{DEFAULT_CONTROL_TYPE, ID_ATTR, INPUT_TAG, TYPE_ATTR};

/// The kind of a render tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A tagged node with attributes, live state, behaviors and children.
    Element,
    /// A text leaf.
    Text,
    /// A comment leaf.
    Comment,
}

impl NodeType {
    /// Returns true for the leaf kinds that carry a content value.
    pub fn is_character_data(self) -> bool {
        matches!(self, NodeType::Text | NodeType::Comment)
    }
}

/// An attribute key: optional namespace URI plus local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrName {
    /// The namespace URI, `None` for attributes in no namespace.
    pub namespace: Option<String>,
    /// The local part of the name (without prefix).
    pub local_name: String,
}

impl AttrName {
    /// Creates an attribute name in no namespace.
    pub fn local(local_name: impl Into<String>) -> Self {
        AttrName {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Creates a namespaced attribute name.
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        AttrName {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Returns true if this name has no namespace and the given local name.
    pub fn is_local(&self, local_name: &str) -> bool {
        self.namespace.is_none() && self.local_name == local_name
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Boolean live-state channels of a form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveFlag {
    /// Whether a checkbox or radio control is checked.
    Checked,
    /// Whether the control is disabled.
    Disabled,
}

impl LiveFlag {
    /// Returns the name of the marker attribute mirroring this flag.
    pub fn attr_name(self) -> &'static str {
        match self {
            LiveFlag::Checked => "checked",
            LiveFlag::Disabled => "disabled",
        }
    }
}

/// Operations the reconciler needs from a render tree node handle.
pub trait HostNode: Clone {
    /// Handler type stored under a behavior name.
    type Behavior: Clone + fmt::Debug;

    /// Returns the kind of this node.
    fn node_type(&self) -> NodeType;

    /// Returns the tag name for elements, `None` for leaves.
    fn tag_name(&self) -> Option<String>;

    /// Returns the content value of text and comment nodes.
    fn content(&self) -> Option<String>;

    /// Overwrites the content value of a text or comment node.
    fn set_content(&self, value: &str);

    /// Returns the number of child nodes.
    fn child_count(&self) -> usize;

    /// Returns the child at `index`, or `None` past the end.
    fn child_at(&self, index: usize) -> Option<Self>;

    /// Returns the parent node, if attached.
    fn parent(&self) -> Option<Self>;

    /// Appends `child`, detaching it from its current parent first.
    fn append_child(&self, child: &Self);

    /// Inserts `child` before `reference`, detaching it from its current
    /// parent first. `reference` must be a child of `self`.
    fn insert_before(&self, child: &Self, reference: &Self);

    /// Removes `child` from this node's children.
    fn remove_child(&self, child: &Self);

    /// Puts `new_child` in the place of `old_child`, detaching `new_child`
    /// from its current parent first.
    fn replace_child(&self, new_child: &Self, old_child: &Self);

    /// Returns the names of all attributes, in a stable order.
    fn attribute_names(&self) -> Vec<AttrName>;

    /// Returns the value of an attribute.
    fn attribute(&self, name: &AttrName) -> Option<String>;

    /// Sets an attribute value.
    fn set_attribute(&self, name: &AttrName, value: &str);

    /// Removes an attribute. Removing a missing attribute does nothing.
    fn remove_attribute(&self, name: &AttrName);

    /// Returns true if the attribute is present.
    fn has_attribute(&self, name: &AttrName) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns the live (current) value of a form control.
    fn live_value(&self) -> String;

    /// Sets the live value of a form control.
    fn set_live_value(&self, value: &str);

    /// Returns a boolean live-state channel.
    fn live_flag(&self, flag: LiveFlag) -> bool;

    /// Sets a boolean live-state channel.
    fn set_live_flag(&self, flag: LiveFlag, value: bool);

    /// Returns the behavior bound under `name`.
    fn behavior(&self, name: &str) -> Option<Self::Behavior>;

    /// Binds (or with `None`, clears) the behavior under `name`.
    fn set_behavior(&self, name: &str, handler: Option<Self::Behavior>);

    /// Returns true if both handles refer to the same node instance.
    fn ptr_eq(&self, other: &Self) -> bool;

    /// Native same-instance predicate of the host tree.
    ///
    /// Hosts without one keep the default, which never reports a match.
    fn is_same_node(&self, _other: &Self) -> bool {
        false
    }

    /// Returns the node's identifier, the `id` attribute of elements.
    fn identifier(&self) -> Option<String> {
        match self.node_type() {
            NodeType::Element => self.attribute(&AttrName::local(ID_ATTR)),
            NodeType::Text | NodeType::Comment => None,
        }
    }

    /// Returns true if the node is a form control with live state.
    fn is_form_control(&self) -> bool {
        self.tag_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(INPUT_TAG))
    }

    /// Returns the lower-cased control type of a form control.
    fn control_type(&self) -> String {
        self.attribute(&AttrName::local(TYPE_ATTR))
            .map(|t| t.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_CONTROL_TYPE.to_string())
    }

    /// Returns true if `other` is this node or one of its descendants.
    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Short label for logs: the tag name, `#text` or `#comment`.
    fn label(&self) -> String {
        match self.node_type() {
            NodeType::Element => self.tag_name().unwrap_or_default(),
            NodeType::Text => "#text".to_string(),
            NodeType::Comment => "#comment".to_string(),
        }
    }
}
