//! Node equality oracle.

use crate::host::HostNode;

/// Returns the identifier of `node` if it is present and non-empty.
pub(crate) fn non_empty_identifier<N: HostNode>(node: &N) -> Option<String> {
    node.identifier().filter(|id| !id.is_empty())
}

/// Decides whether `a` and `b` represent the same logical entity.
///
/// The relation is not symmetric: only `a`'s identifier is consulted as the
/// match key. Elements without an identifier are never the same entity unless
/// the host reports them as the same instance.
pub fn is_same_entity<N: HostNode>(a: &N, b: &N) -> bool {
    if let Some(id) = non_empty_identifier(a) {
        return b.identifier().as_deref() == Some(id.as_str());
    }
    if a.is_same_node(b) {
        return true;
    }
    if a.tag_name() != b.tag_name() {
        return false;
    }
    if a.node_type().is_character_data() && b.node_type().is_character_data() {
        return a.content() == b.content();
    }
    false
}
