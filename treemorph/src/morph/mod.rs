//! Render tree reconciliation.
//!
//! This module morphs an old (live) tree in place until it matches a new
//! tree, keeping old node instances wherever it can:
//!
//! - [`same`]: decides whether two nodes are the same logical entity
//! - [`attrs`], [`behavior`], [`input`]: per-node synchronizers
//! - `children`: the forward-only child list reconciler
//! - [`mutation`]: records every mutation applied to the old tree
//!
//! The walk itself is synchronous and total over well-formed trees: mismatched
//! shapes degrade to wholesale replacement, never to an error.

pub mod attrs;
pub mod behavior;
mod children;
pub mod input;
pub mod mutation;
pub mod same;

pub use behavior::{BehaviorNames, BehaviorResolver};
pub use mutation::{Mutation, MutationKind, MutationLog};
pub use same::is_same_entity;

use log::trace;

use crate::error::{Error, Result};
use crate::host::{HostNode, NodeType};

/// Reconciles `new` into `old` and returns the resulting tree.
///
/// - `old` absent: returns `new` unchanged (the caller splices it in).
/// - `new` absent: returns `None` (the caller removes `old`).
/// - otherwise: returns `old` morphed in place, or `new` when the two roots
///   cannot be morphed into each other.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when both trees are absent or when one tree
/// contains the other. No mutation happens in that case.
pub fn reconcile<N: HostNode>(
    new: Option<&N>,
    old: Option<&N>,
    resolver: Option<&dyn BehaviorResolver<N>>,
) -> Result<Option<N>> {
    let mut log = MutationLog::new();
    Walk {
        resolver,
        log: &mut log,
    }
    .run(new, old)
}

/// A reusable reconciler carrying a behavior resolver and a mutation log.
///
/// The log accumulates across calls until it is taken or cleared.
pub struct Reconciler<N: HostNode> {
    resolver: Option<Box<dyn BehaviorResolver<N>>>,
    log: MutationLog<N>,
}

impl<N: HostNode> Default for Reconciler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: HostNode> Reconciler<N> {
    /// Creates a reconciler without a behavior resolver.
    pub fn new() -> Self {
        Reconciler {
            resolver: None,
            log: MutationLog::new(),
        }
    }

    /// Sets the behavior resolver.
    pub fn with_resolver(mut self, resolver: impl BehaviorResolver<N> + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Reconciles `new` into `old`. See [`reconcile`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unusable top-level arguments.
    pub fn reconcile(&mut self, new: Option<&N>, old: Option<&N>) -> Result<Option<N>> {
        Walk {
            resolver: self.resolver.as_deref(),
            log: &mut self.log,
        }
        .run(new, old)
    }

    /// Returns the mutations recorded so far.
    pub fn log(&self) -> &MutationLog<N> {
        &self.log
    }

    /// Takes the recorded mutations, leaving an empty log.
    pub fn take_log(&mut self) -> MutationLog<N> {
        std::mem::take(&mut self.log)
    }
}

/// State of one reconcile call.
pub(crate) struct Walk<'a, N: HostNode> {
    resolver: Option<&'a dyn BehaviorResolver<N>>,
    log: &'a mut MutationLog<N>,
}

impl<N: HostNode> Walk<'_, N> {
    fn run(&mut self, new: Option<&N>, old: Option<&N>) -> Result<Option<N>> {
        validate(new, old)?;
        Ok(self.walk(new, old))
    }

    /// Decides between insert, delete, keep, replace and morph for one pair.
    pub(crate) fn walk(&mut self, new: Option<&N>, old: Option<&N>) -> Option<N> {
        let Some(old) = old else {
            return new.cloned();
        };
        let new = new?;

        if new.is_same_node(old) {
            trace!("{} is the same node; keeping", old.label());
            return Some(old.clone());
        }
        if new.node_type() != old.node_type() || new.tag_name() != old.tag_name() {
            trace!("{} cannot become {}; replacing", old.label(), new.label());
            return Some(new.clone());
        }

        trace!("morphing {}", old.label());
        self.morph_node(new, old);
        self.update_children(new, old);
        Some(old.clone())
    }

    /// Copies node-level state (attributes, behaviors, live state, content).
    fn morph_node(&mut self, new: &N, old: &N) {
        match new.node_type() {
            NodeType::Element => {
                attrs::sync_attributes(new, old, self.log);
                behavior::sync_behaviors(new, old, self.resolver, self.log);
                if new.is_form_control() {
                    input::sync_input(new, old, self.log);
                }
            }
            NodeType::Text | NodeType::Comment => {
                let value = new.content();
                if value != old.content() {
                    self.log.apply(Mutation::SetContent {
                        node: old.clone(),
                        value: value.unwrap_or_default(),
                    });
                }
            }
        }
    }
}

fn validate<N: HostNode>(new: Option<&N>, old: Option<&N>) -> Result<()> {
    match (new, old) {
        (None, None) => Err(Error::InvalidInput(
            "both the new and the old tree are absent".to_string(),
        )),
        (Some(new), Some(old)) if !new.ptr_eq(old) && (old.contains(new) || new.contains(old)) => {
            Err(Error::InvalidInput(format!(
                "{} and {} are nested in one another",
                new.label(),
                old.label()
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AttrName;
    use crate::node::{
        element_with_children, new_comment_node, new_element_node, new_text_node, Element, NodeRef,
    };

    fn el(tag: &str) -> Element {
        Element::new(tag)
    }

    #[test]
    fn test_absent_old_returns_new() {
        let new = new_element_node(el("div"));
        let result = reconcile(Some(&new), None, None).unwrap().unwrap();
        assert!(result.ptr_eq(&new));
    }

    #[test]
    fn test_absent_new_returns_none() {
        let old = new_element_node(el("div"));
        assert!(reconcile(None, Some(&old), None).unwrap().is_none());
    }

    #[test]
    fn test_both_absent_is_invalid() {
        let err = reconcile::<NodeRef>(None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_nested_trees_are_invalid_and_untouched() {
        let inner = new_element_node(el("div").attr("class", "inner"));
        let outer = element_with_children(el("div"), vec![inner.clone()]);

        let mut reconciler = Reconciler::new();
        let err = reconciler.reconcile(Some(&inner), Some(&outer)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        let err = reconciler.reconcile(Some(&outer), Some(&inner)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        assert!(reconciler.log().is_empty());
        assert_eq!(outer.child_count(), 1);
        assert!(!outer.has_attribute(&AttrName::local("class")));
    }

    #[test]
    fn test_same_tree_is_untouched() {
        let tree = element_with_children(el("div").attr("a", "1"), vec![new_text_node("t")]);
        let mut reconciler = Reconciler::new();

        let result = reconciler.reconcile(Some(&tree), Some(&tree)).unwrap().unwrap();

        assert!(result.ptr_eq(&tree));
        assert!(reconciler.log().is_empty());
    }

    #[test]
    fn test_tag_mismatch_returns_new_wholesale() {
        let old = new_element_node(el("span").attr("a", "1"));
        let new = new_element_node(el("div"));
        let mut reconciler = Reconciler::new();

        let result = reconciler.reconcile(Some(&new), Some(&old)).unwrap().unwrap();

        assert!(result.ptr_eq(&new));
        assert!(old.has_attribute(&AttrName::local("a")));
        assert!(reconciler.log().is_empty());
    }

    #[test]
    fn test_kind_mismatch_returns_new() {
        let old = new_text_node("x");
        let new = new_comment_node("x");
        let result = reconcile(Some(&new), Some(&old), None).unwrap().unwrap();
        assert!(result.ptr_eq(&new));
    }

    #[test]
    fn test_text_content_written_only_when_changed() {
        let old = new_text_node("a");
        let mut reconciler = Reconciler::new();

        reconciler
            .reconcile(Some(&new_text_node("a")), Some(&old))
            .unwrap();
        assert!(reconciler.log().is_empty());

        let result = reconciler
            .reconcile(Some(&new_text_node("b")), Some(&old))
            .unwrap()
            .unwrap();
        assert!(result.ptr_eq(&old));
        assert_eq!(old.content(), Some("b".to_string()));
        assert_eq!(reconciler.log().count(MutationKind::CONTENT), 1);
    }

    #[test]
    fn test_take_log_resets() {
        let old = new_element_node(el("div"));
        let new = new_element_node(el("div").attr("a", "1"));
        let mut reconciler = Reconciler::new();

        reconciler.reconcile(Some(&new), Some(&old)).unwrap();
        let log = reconciler.take_log();

        assert_eq!(log.len(), 1);
        assert!(reconciler.log().is_empty());
    }

    #[test]
    fn test_resolver_drives_behavior_sync() {
        use crate::node::Behavior;

        let click = Behavior::new(|_| {});
        let old = new_element_node(el("button"));
        let new = new_element_node(el("button").behavior("onclick", click.clone()));
        let mut reconciler = Reconciler::new().with_resolver(BehaviorNames::new(["onclick"]));

        reconciler.reconcile(Some(&new), Some(&old)).unwrap();

        assert_eq!(old.behavior("onclick"), Some(click));
        assert_eq!(reconciler.log().count(MutationKind::BEHAVIOR), 1);
    }

    #[test]
    fn test_input_state_runs_only_for_controls() {
        let old = new_element_node(el("div").attr("value", "1"));
        let new = new_element_node(el("div").attr("value", "1"));
        old.set_live_value("typed");

        reconcile(Some(&new), Some(&old), None).unwrap();

        assert_eq!(old.live_value(), "typed");
    }
}
