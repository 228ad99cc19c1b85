//! Behavior synchronizer and behavior-name resolvers.

use super::mutation::{Mutation, MutationLog};
use crate::host::HostNode;

/// Reports which behavior names apply to a node pair.
///
/// The reconciler has no built-in knowledge of behavior names; whatever the
/// resolver returns is the complete set it synchronizes.
pub trait BehaviorResolver<N: HostNode> {
    /// Returns the ordered behavior names to synchronize from `new` to `old`.
    fn behavior_names(&self, new: &N, old: &N) -> Vec<String>;
}

impl<N, F> BehaviorResolver<N> for F
where
    N: HostNode,
    F: Fn(&N, &N) -> Vec<String>,
{
    fn behavior_names(&self, new: &N, old: &N) -> Vec<String> {
        self(new, old)
    }
}

/// A resolver returning the same fixed list of names for every node pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BehaviorNames(Vec<String>);

impl BehaviorNames {
    /// Creates a resolver from a list of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BehaviorNames(names.into_iter().map(Into::into).collect())
    }

    /// Returns the names.
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl<N: HostNode> BehaviorResolver<N> for BehaviorNames {
    fn behavior_names(&self, _new: &N, _old: &N) -> Vec<String> {
        self.0.clone()
    }
}

/// Copies the behaviors reported by `resolver` from `new` onto `old`.
///
/// A name bound on `new` is copied over whatever `old` has. A name bound only
/// on `old` is cleared. Without a resolver nothing happens.
pub fn sync_behaviors<N: HostNode>(
    new: &N,
    old: &N,
    resolver: Option<&dyn BehaviorResolver<N>>,
    log: &mut MutationLog<N>,
) {
    let Some(resolver) = resolver else {
        return;
    };
    for name in resolver.behavior_names(new, old) {
        if let Some(handler) = new.behavior(&name) {
            log.apply(Mutation::SetBehavior {
                node: old.clone(),
                name,
                handler,
            });
        } else if old.behavior(&name).is_some() {
            log.apply(Mutation::ClearBehavior {
                node: old.clone(),
                name,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{new_element_node, Behavior, Element, NodeRef};

    fn button(behaviors: &[(&str, &Behavior)]) -> NodeRef {
        let mut element = Element::new("button");
        for (name, handler) in behaviors {
            element = element.behavior(name, (*handler).clone());
        }
        new_element_node(element)
    }

    #[test]
    fn test_no_resolver_is_noop() {
        let click = Behavior::new(|_| {});
        let new = button(&[("onclick", &click)]);
        let old = button(&[]);
        let mut log = MutationLog::new();

        sync_behaviors(&new, &old, None, &mut log);

        assert!(old.behavior("onclick").is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_copy_and_clear() {
        let click = Behavior::new(|_| {});
        let stale = Behavior::new(|_| {});
        let hover = Behavior::new(|_| {});
        let new = button(&[("onclick", &click)]);
        let old = button(&[("onclick", &stale), ("onmouseover", &hover)]);
        let resolver = BehaviorNames::new(["onclick", "onmouseover", "onfocus"]);
        let mut log = MutationLog::new();

        sync_behaviors(&new, &old, Some(&resolver), &mut log);

        assert_eq!(old.behavior("onclick"), Some(click));
        assert!(old.behavior("onmouseover").is_none());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_unreported_names_are_left_alone() {
        let hover = Behavior::new(|_| {});
        let new = button(&[]);
        let old = button(&[("onmouseover", &hover)]);
        let resolver = BehaviorNames::new(["onclick"]);
        let mut log = MutationLog::new();

        sync_behaviors(&new, &old, Some(&resolver), &mut log);

        assert_eq!(old.behavior("onmouseover"), Some(hover));
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_resolver_sees_the_pair() {
        let click = Behavior::new(|_| {});
        let new = button(&[("onclick", &click)]);
        let old = button(&[]);
        let resolver = |n: &NodeRef, _o: &NodeRef| {
            if n.tag_name().as_deref() == Some("button") {
                vec!["onclick".to_string()]
            } else {
                Vec::new()
            }
        };
        let mut log = MutationLog::new();

        sync_behaviors(&new, &old, Some(&resolver), &mut log);

        assert_eq!(old.behavior("onclick"), Some(click));
    }
}
