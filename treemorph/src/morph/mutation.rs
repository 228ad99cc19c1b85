//! Mutation logging for the reconciler.
//!
//! Every write the reconciler makes to the old tree goes through
//! [`MutationLog::apply`], which performs it on the host and records it. The
//! log is how callers (and tests) observe that an unchanged tree produced no
//! writes, or that a range control was forcibly rewritten.

use std::io::Write;

use bitflags::bitflags;

use crate::host::{AttrName, HostNode, LiveFlag};

bitflags! {
    /// Categories of mutations, used to filter and count log entries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MutationKind: u8 {
        /// Attribute set or removal.
        const ATTRIBUTE = 1;
        /// Text or comment content write.
        const CONTENT = 1 << 1;
        /// Live form-control state write.
        const LIVE = 1 << 2;
        /// Behavior bind or clear.
        const BEHAVIOR = 1 << 3;
        /// Child list change: append, insert, remove or replace.
        const STRUCTURE = 1 << 4;
        /// Everything that changes a node without touching child lists.
        const NODE = Self::ATTRIBUTE.bits()
            | Self::CONTENT.bits()
            | Self::LIVE.bits()
            | Self::BEHAVIOR.bits();
    }
}

/// A single mutation applied to the old tree.
#[derive(Debug, Clone)]
pub enum Mutation<N: HostNode> {
    /// An attribute was added or changed.
    SetAttribute {
        node: N,
        name: AttrName,
        value: String,
    },
    /// An attribute was removed.
    RemoveAttribute { node: N, name: AttrName },
    /// A text or comment value was overwritten.
    SetContent { node: N, value: String },
    /// A form control's live value was written.
    SetLiveValue { node: N, value: String },
    /// A form control's boolean live state was written.
    SetLiveFlag {
        node: N,
        flag: LiveFlag,
        value: bool,
    },
    /// A behavior was bound (or rebound).
    SetBehavior {
        node: N,
        name: String,
        handler: N::Behavior,
    },
    /// A behavior was cleared.
    ClearBehavior { node: N, name: String },
    /// A node was appended to a parent.
    Append { parent: N, child: N },
    /// A node was inserted before a sibling.
    InsertBefore { parent: N, child: N, reference: N },
    /// A node was removed from a parent.
    Remove { parent: N, child: N },
    /// A node took the place of another.
    Replace {
        parent: N,
        new_child: N,
        old_child: N,
    },
}

impl<N: HostNode> Mutation<N> {
    /// Returns the category of this mutation.
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::SetAttribute { .. } | Mutation::RemoveAttribute { .. } => {
                MutationKind::ATTRIBUTE
            }
            Mutation::SetContent { .. } => MutationKind::CONTENT,
            Mutation::SetLiveValue { .. } | Mutation::SetLiveFlag { .. } => MutationKind::LIVE,
            Mutation::SetBehavior { .. } | Mutation::ClearBehavior { .. } => {
                MutationKind::BEHAVIOR
            }
            Mutation::Append { .. }
            | Mutation::InsertBefore { .. }
            | Mutation::Remove { .. }
            | Mutation::Replace { .. } => MutationKind::STRUCTURE,
        }
    }

    /// Returns the node whose state (or child list) was changed.
    pub fn target(&self) -> &N {
        match self {
            Mutation::SetAttribute { node, .. }
            | Mutation::RemoveAttribute { node, .. }
            | Mutation::SetContent { node, .. }
            | Mutation::SetLiveValue { node, .. }
            | Mutation::SetLiveFlag { node, .. }
            | Mutation::SetBehavior { node, .. }
            | Mutation::ClearBehavior { node, .. } => node,
            Mutation::Append { parent, .. }
            | Mutation::InsertBefore { parent, .. }
            | Mutation::Remove { parent, .. }
            | Mutation::Replace { parent, .. } => parent,
        }
    }

    /// Performs the mutation on the host tree.
    fn perform(&self) {
        match self {
            Mutation::SetAttribute { node, name, value } => node.set_attribute(name, value),
            Mutation::RemoveAttribute { node, name } => node.remove_attribute(name),
            Mutation::SetContent { node, value } => node.set_content(value),
            Mutation::SetLiveValue { node, value } => node.set_live_value(value),
            Mutation::SetLiveFlag { node, flag, value } => node.set_live_flag(*flag, *value),
            Mutation::SetBehavior {
                node,
                name,
                handler,
            } => node.set_behavior(name, Some(handler.clone())),
            Mutation::ClearBehavior { node, name } => node.set_behavior(name, None),
            Mutation::Append { parent, child } => parent.append_child(child),
            Mutation::InsertBefore {
                parent,
                child,
                reference,
            } => parent.insert_before(child, reference),
            Mutation::Remove { parent, child } => parent.remove_child(child),
            Mutation::Replace {
                parent,
                new_child,
                old_child,
            } => parent.replace_child(new_child, old_child),
        }
    }

    /// Returns a one-line description for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Mutation::SetAttribute { node, name, value } => {
                format!("set {} {}=\"{}\"", node.label(), name, value)
            }
            Mutation::RemoveAttribute { node, name } => {
                format!("remove {} {}", node.label(), name)
            }
            Mutation::SetContent { node, value } => {
                format!("content {} \"{}\"", node.label(), value)
            }
            Mutation::SetLiveValue { node, value } => {
                format!("live {} value=\"{}\"", node.label(), value)
            }
            Mutation::SetLiveFlag { node, flag, value } => {
                format!("live {} {}={}", node.label(), flag.attr_name(), value)
            }
            Mutation::SetBehavior { node, name, .. } => {
                format!("bind {} {}", node.label(), name)
            }
            Mutation::ClearBehavior { node, name } => {
                format!("unbind {} {}", node.label(), name)
            }
            Mutation::Append { parent, child } => {
                format!("append {} to {}", child.label(), parent.label())
            }
            Mutation::InsertBefore {
                parent,
                child,
                reference,
            } => format!(
                "insert {} before {} in {}",
                child.label(),
                reference.label(),
                parent.label()
            ),
            Mutation::Remove { parent, child } => {
                format!("remove {} from {}", child.label(), parent.label())
            }
            Mutation::Replace {
                parent,
                new_child,
                old_child,
            } => format!(
                "replace {} with {} in {}",
                old_child.label(),
                new_child.label(),
                parent.label()
            ),
        }
    }
}

/// Ordered log of mutations applied during reconciliation.
#[derive(Debug, Clone)]
pub struct MutationLog<N: HostNode> {
    entries: Vec<Mutation<N>>,
}

impl<N: HostNode> Default for MutationLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: HostNode> MutationLog<N> {
    /// Creates a new empty log.
    pub fn new() -> Self {
        MutationLog {
            entries: Vec::new(),
        }
    }

    /// Performs a mutation on the host tree and records it.
    pub fn apply(&mut self, mutation: Mutation<N>) {
        mutation.perform();
        self.entries.push(mutation);
    }

    /// Returns all recorded mutations in order.
    pub fn entries(&self) -> &[Mutation<N>] {
        &self.entries
    }

    /// Returns the total number of recorded mutations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts the mutations whose kind intersects `kinds`.
    pub fn count(&self, kinds: MutationKind) -> usize {
        self.entries
            .iter()
            .filter(|m| kinds.intersects(m.kind()))
            .count()
    }

    /// Iterates over mutations whose kind intersects `kinds`.
    pub fn filter(&self, kinds: MutationKind) -> impl Iterator<Item = &Mutation<N>> {
        self.entries
            .iter()
            .filter(move |m| kinds.intersects(m.kind()))
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes one line per mutation.
    pub fn write_entries<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for mutation in &self.entries {
            writeln!(writer, "{}", mutation.describe())?;
        }
        Ok(())
    }

    /// Returns a one-line count per category, e.g. `3 attribute, 1 structure`.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (MutationKind::ATTRIBUTE, "attribute"),
            (MutationKind::CONTENT, "content"),
            (MutationKind::LIVE, "live"),
            (MutationKind::BEHAVIOR, "behavior"),
            (MutationKind::STRUCTURE, "structure"),
        ]
        .iter()
        .filter_map(|&(kind, label)| {
            let n = self.count(kind);
            (n > 0).then(|| format!("{} {}", n, label))
        })
        .collect();

        if parts.is_empty() {
            "no mutations".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{new_element_node, new_text_node, Element, NodeRef};

    #[test]
    fn test_apply_performs_and_records() {
        let node = new_element_node(Element::new("div"));
        let mut log: MutationLog<NodeRef> = MutationLog::new();

        log.apply(Mutation::SetAttribute {
            node: node.clone(),
            name: AttrName::local("class"),
            value: "a".to_string(),
        });

        assert_eq!(node.attribute(&AttrName::local("class")), Some("a".to_string()));
        assert_eq!(log.len(), 1);
        assert_eq!(log.count(MutationKind::ATTRIBUTE), 1);
        assert_eq!(log.count(MutationKind::STRUCTURE), 0);
    }

    #[test]
    fn test_kind_flags() {
        assert!(MutationKind::NODE.contains(MutationKind::LIVE));
        assert!(!MutationKind::NODE.contains(MutationKind::STRUCTURE));
    }

    #[test]
    fn test_summary_and_entries() {
        let parent = new_element_node(Element::new("p"));
        let text = new_text_node("hi");
        let mut log = MutationLog::new();
        assert_eq!(log.summary(), "no mutations");

        log.apply(Mutation::Append {
            parent: parent.clone(),
            child: text.clone(),
        });
        log.apply(Mutation::SetContent {
            node: text.clone(),
            value: "bye".to_string(),
        });

        assert_eq!(log.summary(), "1 content, 1 structure");
        assert!(log.entries()[0].target().ptr_eq(&parent));
        assert_eq!(text.content(), Some("bye".to_string()));

        let mut out = Vec::new();
        log.write_entries(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("append text#"));

        let structural: Vec<_> = log.filter(MutationKind::STRUCTURE).collect();
        assert_eq!(structural.len(), 1);
        assert!(log.filter(MutationKind::LIVE).next().is_none());

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.summary(), "no mutations");
    }
}
