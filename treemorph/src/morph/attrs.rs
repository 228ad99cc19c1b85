//! Attribute synchronizer.

use log::trace;

use super::mutation::{Mutation, MutationLog};
use crate::constants::NULL_SENTINELS;
use crate::host::HostNode;

/// Makes `old`'s attribute set equal to `new`'s.
///
/// Attributes missing on `old` are added verbatim. Changed attributes are
/// updated, except that a sentinel value removes the attribute instead.
/// Attributes missing on `new` are removed.
pub fn sync_attributes<N: HostNode>(new: &N, old: &N, log: &mut MutationLog<N>) {
    for name in new.attribute_names() {
        let Some(value) = new.attribute(&name) else {
            continue;
        };
        match old.attribute(&name) {
            None => log.apply(Mutation::SetAttribute {
                node: old.clone(),
                name,
                value,
            }),
            Some(current) if current == value => {}
            Some(_) if NULL_SENTINELS.contains(&value.as_str()) => {
                trace!("attribute {} on {} set to {:?}; removing", name, old.label(), value);
                log.apply(Mutation::RemoveAttribute {
                    node: old.clone(),
                    name,
                })
            }
            Some(_) => log.apply(Mutation::SetAttribute {
                node: old.clone(),
                name,
                value,
            }),
        }
    }

    for name in old.attribute_names() {
        if !new.has_attribute(&name) {
            log.apply(Mutation::RemoveAttribute {
                node: old.clone(),
                name,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AttrName;
    use crate::node::{new_element_node, Element, NodeRef};

    fn attrs(node: &NodeRef) -> Vec<(String, String)> {
        node.attribute_names()
            .into_iter()
            .map(|n| {
                let v = node.attribute(&n).unwrap();
                (n.to_string(), v)
            })
            .collect()
    }

    #[test]
    fn test_symmetric_difference() {
        let old = new_element_node(Element::new("div").attr("a", "1").attr("b", "2"));
        let new = new_element_node(Element::new("div").attr("b", "2").attr("c", "3"));
        let mut log = MutationLog::new();

        sync_attributes(&new, &old, &mut log);

        assert_eq!(
            attrs(&old),
            vec![
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string())
            ]
        );
        // c added, a removed, b untouched
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_changed_value_is_updated() {
        let old = new_element_node(Element::new("div").attr("class", "a"));
        let new = new_element_node(Element::new("div").attr("class", "b"));
        let mut log = MutationLog::new();

        sync_attributes(&new, &old, &mut log);

        assert_eq!(old.attribute(&AttrName::local("class")), Some("b".to_string()));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_sentinels_remove_existing_attribute() {
        for sentinel in ["null", "undefined"] {
            let old = new_element_node(Element::new("div").attr("title", "t"));
            let new = new_element_node(Element::new("div").attr("title", sentinel));
            let mut log = MutationLog::new();

            sync_attributes(&new, &old, &mut log);

            assert!(!old.has_attribute(&AttrName::local("title")));
        }
    }

    #[test]
    fn test_sentinel_on_missing_attribute_is_set_verbatim() {
        let old = new_element_node(Element::new("div"));
        let new = new_element_node(Element::new("div").attr("title", "null"));
        let mut log = MutationLog::new();

        sync_attributes(&new, &old, &mut log);

        assert_eq!(old.attribute(&AttrName::local("title")), Some("null".to_string()));
    }

    #[test]
    fn test_namespaces_are_distinct_keys() {
        let xlink = AttrName::namespaced(crate::constants::XLINK_NAMESPACE, "href");
        let old = new_element_node(Element::new("use").attr("href", "#a"));
        let new = new_element_node(Element::new("use"));
        new.set_attribute(&xlink, "#a");
        let mut log = MutationLog::new();

        sync_attributes(&new, &old, &mut log);

        assert!(!old.has_attribute(&AttrName::local("href")));
        assert_eq!(old.attribute(&xlink), Some("#a".to_string()));
    }

    #[test]
    fn test_equal_sets_record_nothing() {
        let old = new_element_node(Element::new("div").attr("a", "1"));
        let new = new_element_node(Element::new("div").attr("a", "1"));
        let mut log = MutationLog::new();

        sync_attributes(&new, &old, &mut log);

        assert!(log.is_empty());
    }
}
