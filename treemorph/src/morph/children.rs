//! Child reconciler.
//!
//! Aligns the live child list of an old parent with the children of a new
//! parent in a single forward pass. `i` indexes the old list and `i - offset`
//! the new list. Grafting a new child into the old tree detaches it from the
//! new parent, which shortens the new list by one; `offset` is bumped at
//! exactly those points so that `i - offset` keeps pointing at the next
//! unprocessed new child.

use log::{debug, trace};

use super::mutation::Mutation;
use super::same::{is_same_entity, non_empty_identifier};
use super::Walk;
use crate::host::HostNode;

impl<N: HostNode> Walk<'_, N> {
    /// Reconciles the children of `old` against the children of `new`.
    pub(super) fn update_children(&mut self, new: &N, old: &N) {
        let mut offset = 0usize;
        let mut i = 0usize;

        loop {
            let old_child = old.child_at(i);
            let new_child = new.child_at(i - offset);

            match (new_child, old_child) {
                (None, None) => break,

                (None, Some(old_child)) => {
                    debug!("removing {} from {}", old_child.label(), old.label());
                    self.log.apply(Mutation::Remove {
                        parent: old.clone(),
                        child: old_child,
                    });
                    // The next old child slid into slot i.
                    continue;
                }

                (Some(new_child), None) => {
                    debug!("appending {} to {}", new_child.label(), old.label());
                    self.log.apply(Mutation::Append {
                        parent: old.clone(),
                        child: new_child,
                    });
                    offset += 1;
                }

                (Some(new_child), Some(old_child)) => {
                    if is_same_entity(&new_child, &old_child) {
                        trace!("{} matches in place", old_child.label());
                        offset += self.morph_in_place(old, &new_child, &old_child);
                    } else if let Some(matched) = find_ahead(old, i, &new_child) {
                        offset += self.move_forward(old, &new_child, &matched, &old_child);
                    } else if non_empty_identifier(&new_child).is_none()
                        && non_empty_identifier(&old_child).is_none()
                    {
                        trace!("{} has no match; morphing positionally", old_child.label());
                        offset += self.morph_in_place(old, &new_child, &old_child);
                    } else {
                        debug!(
                            "grafting {} before {} in {}",
                            new_child.label(),
                            old_child.label(),
                            old.label()
                        );
                        self.log.apply(Mutation::InsertBefore {
                            parent: old.clone(),
                            child: new_child,
                            reference: old_child,
                        });
                        offset += 1;
                    }
                }
            }

            i += 1;
        }
    }

    /// Walks a pair that occupies the same slot, replacing `old_child` when
    /// the walk returns another node. Returns the offset increment.
    fn morph_in_place(&mut self, parent: &N, new_child: &N, old_child: &N) -> usize {
        match self.walk(Some(new_child), Some(old_child)) {
            Some(morphed) if !morphed.ptr_eq(old_child) => {
                debug!(
                    "replacing {} with {} in {}",
                    old_child.label(),
                    morphed.label(),
                    parent.label()
                );
                self.log.apply(Mutation::Replace {
                    parent: parent.clone(),
                    new_child: morphed,
                    old_child: old_child.clone(),
                });
                1
            }
            _ => 0,
        }
    }

    /// Walks a matched node found ahead of slot `i` and moves the result in
    /// front of `old_child`. Returns the offset increment.
    fn move_forward(&mut self, parent: &N, new_child: &N, matched: &N, old_child: &N) -> usize {
        let Some(morphed) = self.walk(Some(new_child), Some(matched)) else {
            return 0;
        };
        let grafted = !morphed.ptr_eq(matched);
        debug!(
            "moving {} before {} in {}",
            morphed.label(),
            old_child.label(),
            parent.label()
        );
        self.log.apply(Mutation::InsertBefore {
            parent: parent.clone(),
            child: morphed,
            reference: old_child.clone(),
        });
        usize::from(grafted)
    }
}

/// Finds the first child of `parent` at or after `start` that is the same
/// entity as `new_child`. Never looks behind `start`.
fn find_ahead<N: HostNode>(parent: &N, start: usize, new_child: &N) -> Option<N> {
    (start..parent.child_count())
        .filter_map(|index| parent.child_at(index))
        .find(|candidate| is_same_entity(candidate, new_child))
}
