//! Live state and behaviors carried by elements.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::NodeRef;
use crate::constants::VALUE_ATTR;
use crate::host::{AttrName, LiveFlag};

/// The current state of a form control.
///
/// Kept apart from attributes: the `value` attribute is only the initial value
/// once the user has edited a control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveState {
    /// Current value.
    pub value: String,
    /// Current checked state.
    pub checked: bool,
    /// Current disabled state.
    pub disabled: bool,
}

impl LiveState {
    /// Derives the initial live state from an attribute set.
    pub fn from_attributes(attributes: &BTreeMap<AttrName, String>) -> Self {
        let present = |name: &str| attributes.contains_key(&AttrName::local(name));
        LiveState {
            value: attributes
                .get(&AttrName::local(VALUE_ATTR))
                .cloned()
                .unwrap_or_default(),
            checked: present(LiveFlag::Checked.attr_name()),
            disabled: present(LiveFlag::Disabled.attr_name()),
        }
    }

    /// Returns a boolean channel.
    pub fn flag(&self, flag: LiveFlag) -> bool {
        match flag {
            LiveFlag::Checked => self.checked,
            LiveFlag::Disabled => self.disabled,
        }
    }

    /// Sets a boolean channel.
    pub fn set_flag(&mut self, flag: LiveFlag, value: bool) {
        match flag {
            LiveFlag::Checked => self.checked = value,
            LiveFlag::Disabled => self.disabled = value,
        }
    }
}

/// A named handler bound to an element.
///
/// Handles compare equal when they share the same closure.
#[derive(Clone)]
pub struct Behavior(Rc<dyn Fn(&NodeRef)>);

impl Behavior {
    /// Wraps a closure.
    pub fn new(handler: impl Fn(&NodeRef) + 'static) -> Self {
        Behavior(Rc::new(handler))
    }

    /// Runs the handler against the node it is bound to.
    pub fn invoke(&self, node: &NodeRef) {
        (self.0)(node)
    }
}

impl PartialEq for Behavior {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behavior({:p})", Rc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_from_attributes() {
        let mut attrs = BTreeMap::new();
        attrs.insert(AttrName::local("value"), "hi".to_string());
        attrs.insert(AttrName::local("disabled"), String::new());

        let live = LiveState::from_attributes(&attrs);
        assert_eq!(live.value, "hi");
        assert!(!live.checked);
        assert!(live.disabled);
    }

    #[test]
    fn test_namespaced_value_is_not_live_value() {
        let mut attrs = BTreeMap::new();
        attrs.insert(AttrName::namespaced("urn:x", "value"), "hi".to_string());
        assert_eq!(LiveState::from_attributes(&attrs).value, "");
    }

    #[test]
    fn test_flags() {
        let mut live = LiveState::default();
        live.set_flag(LiveFlag::Checked, true);
        assert!(live.flag(LiveFlag::Checked));
        assert!(!live.flag(LiveFlag::Disabled));
    }

    #[test]
    fn test_behavior_identity() {
        let a = Behavior::new(|_| {});
        let b = Behavior::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_behavior_invoke() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let behavior = Behavior::new(move |_| counter.set(counter.get() + 1));

        let node = crate::node::new_text_node("x");
        behavior.invoke(&node);
        behavior.invoke(&node);
        assert_eq!(hits.get(), 2);
    }
}
