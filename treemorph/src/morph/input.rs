//! Input state synchronizer for form controls.
//!
//! A control's `value`, `checked` and `disabled` attributes only describe its
//! initial state. Once rendered, the live state is what the user sees, so both
//! channels are written explicitly.

use super::mutation::{Mutation, MutationLog};
use crate::constants::{NULL_VALUE, RANGE_CONTROL_TYPE, VALUE_ATTR};
use crate::host::{AttrName, HostNode, LiveFlag};

/// Synchronizes the live state and state attributes of a form control.
pub fn sync_input<N: HostNode>(new: &N, old: &N, log: &mut MutationLog<N>) {
    let value_attr = AttrName::local(VALUE_ATTR);
    let new_value = new.live_value();

    sync_flag(new, old, LiveFlag::Checked, log);
    sync_flag(new, old, LiveFlag::Disabled, log);

    if new_value != old.live_value() {
        log.apply(Mutation::SetAttribute {
            node: old.clone(),
            name: value_attr.clone(),
            value: new_value.clone(),
        });
        log.apply(Mutation::SetLiveValue {
            node: old.clone(),
            value: new_value.clone(),
        });
    }

    if new_value == NULL_VALUE {
        log.apply(Mutation::SetLiveValue {
            node: old.clone(),
            value: String::new(),
        });
        remove_attribute(old, &value_attr, log);
    }

    if !new.has_attribute(&value_attr) {
        remove_attribute(old, &value_attr, log);
    } else if old.control_type() == RANGE_CONTROL_TYPE {
        log.apply(Mutation::SetLiveValue {
            node: old.clone(),
            value: new_value,
        });
    }
}

/// Copies one boolean live channel and its marker attribute when they differ.
fn sync_flag<N: HostNode>(new: &N, old: &N, flag: LiveFlag, log: &mut MutationLog<N>) {
    let value = new.live_flag(flag);
    if value == old.live_flag(flag) {
        return;
    }
    log.apply(Mutation::SetLiveFlag {
        node: old.clone(),
        flag,
        value,
    });
    let name = AttrName::local(flag.attr_name());
    if value {
        log.apply(Mutation::SetAttribute {
            node: old.clone(),
            name,
            value: String::new(),
        });
    } else {
        remove_attribute(old, &name, log);
    }
}

fn remove_attribute<N: HostNode>(node: &N, name: &AttrName, log: &mut MutationLog<N>) {
    if node.has_attribute(name) {
        log.apply(Mutation::RemoveAttribute {
            node: node.clone(),
            name: name.clone(),
        });
    }
}
