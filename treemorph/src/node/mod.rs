//! Node structures for the in-memory render tree.
//!
//! This module provides the reference host tree: reference-counted nodes with
//! parent back-links and cached child positions. It implements
//! [`HostNode`](crate::host::HostNode) in the `host` submodule, which is what
//! the reconciler mutates.

mod content;
mod host;
mod live;

pub use content::{Element, NodeContent};
pub use live::{Behavior, LiveState};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a unique node ID.
fn next_node_id() -> u64 {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// A weak reference to a node.
pub type WeakNodeRef = Weak<RefCell<NodeInner>>;

/// Creates a new node reference.
pub fn new_node_ref(inner: NodeInner) -> NodeRef {
    Rc::new(RefCell::new(inner))
}

/// The inner data of a node in the render tree.
///
/// Each node has:
/// - 0 or more children (elements only)
/// - content (element, text or comment)
/// - A parent (except for roots and detached nodes)
/// - A position among siblings
#[derive(Debug)]
pub struct NodeInner {
    /// Unique identifier for this node, used in logs.
    id: u64,
    /// Child nodes.
    children: Vec<NodeRef>,
    /// Content of this node.
    content: NodeContent,
    /// Weak reference to parent node.
    parent: WeakNodeRef,
    /// Zero-based position among siblings, `None` when detached.
    child_pos: Option<usize>,
}

impl NodeInner {
    /// Creates a detached node with the given content.
    pub fn new(content: NodeContent) -> Self {
        NodeInner {
            id: next_node_id(),
            children: Vec::new(),
            content,
            parent: Weak::new(),
            child_pos: None,
        }
    }

    /// Returns the unique ID of this node.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the content of this node.
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Returns a mutable reference to the content.
    pub fn content_mut(&mut self) -> &mut NodeContent {
        &mut self.content
    }

    /// Returns the element content, if this is an element node.
    pub fn element(&self) -> Option<&Element> {
        self.content.as_element()
    }

    /// Returns the mutable element content, if this is an element node.
    pub fn element_mut(&mut self) -> Option<&mut Element> {
        self.content.as_element_mut()
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a reference to the child at the given index.
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &WeakNodeRef {
        &self.parent
    }

    /// Returns the child position, `None` for roots and detached nodes.
    pub fn child_pos(&self) -> Option<usize> {
        self.child_pos
    }
}

/// Helper functions that work with NodeRef.
impl NodeInner {
    /// Adds a child node at the end, detaching it from any previous parent.
    pub fn add_child_to_ref(parent_ref: &NodeRef, child_ref: NodeRef) {
        Self::detach(&child_ref);
        let index = parent_ref.borrow().children.len();
        {
            let mut child = child_ref.borrow_mut();
            child.parent = Rc::downgrade(parent_ref);
            child.child_pos = Some(index);
        }
        parent_ref.borrow_mut().children.push(child_ref);
    }

    /// Inserts a child at the given index, detaching it from any previous parent.
    ///
    /// The index is interpreted after the detach, so callers moving a node
    /// within the same parent must compute it afterwards.
    pub fn add_child_at_to_ref(parent_ref: &NodeRef, index: usize, child_ref: NodeRef) {
        Self::detach(&child_ref);
        {
            let mut child = child_ref.borrow_mut();
            child.parent = Rc::downgrade(parent_ref);
            child.child_pos = Some(index);
        }
        let mut parent = parent_ref.borrow_mut();
        let index = index.min(parent.children.len());
        parent.children.insert(index, child_ref);
        Self::renumber_from(&parent.children, index);
    }

    /// Replaces the child at the given index, returning the detached old child.
    pub fn replace_child_to_ref(
        parent_ref: &NodeRef,
        index: usize,
        child_ref: NodeRef,
    ) -> Option<NodeRef> {
        Self::detach(&child_ref);
        if index >= parent_ref.borrow().children.len() {
            return None;
        }
        {
            let mut child = child_ref.borrow_mut();
            child.parent = Rc::downgrade(parent_ref);
            child.child_pos = Some(index);
        }
        let old = std::mem::replace(&mut parent_ref.borrow_mut().children[index], child_ref);
        Self::clear_parent(&old);
        Some(old)
    }

    /// Removes the child at the given index, returning it.
    pub fn remove_child_to_ref(parent_ref: &NodeRef, index: usize) -> Option<NodeRef> {
        let removed = {
            let mut parent = parent_ref.borrow_mut();
            if index >= parent.children.len() {
                return None;
            }
            let removed = parent.children.remove(index);
            Self::renumber_from(&parent.children, index);
            removed
        };
        Self::clear_parent(&removed);
        Some(removed)
    }

    /// Returns the index of `child_ref` in `parent_ref`'s children.
    pub fn index_of(parent_ref: &NodeRef, child_ref: &NodeRef) -> Option<usize> {
        let pos = child_ref.borrow().child_pos?;
        let parent = parent_ref.borrow();
        parent
            .children
            .get(pos)
            .filter(|c| Rc::ptr_eq(c, child_ref))
            .map(|_| pos)
    }

    /// Detaches a node from its parent, if it has one.
    pub fn detach(node_ref: &NodeRef) {
        let parent = node_ref.borrow().parent.upgrade();
        if let Some(parent) = parent {
            if let Some(index) = Self::index_of(&parent, node_ref) {
                Self::remove_child_to_ref(&parent, index);
            }
        }
    }

    fn clear_parent(node_ref: &NodeRef) {
        let mut node = node_ref.borrow_mut();
        node.parent = Weak::new();
        node.child_pos = None;
    }

    fn renumber_from(children: &[NodeRef], start: usize) {
        for (i, child) in children.iter().enumerate().skip(start) {
            child.borrow_mut().child_pos = Some(i);
        }
    }
}

/// Creates a detached element node.
pub fn new_element_node(element: Element) -> NodeRef {
    new_node_ref(NodeInner::new(NodeContent::Element(element)))
}

/// Creates a detached text node.
pub fn new_text_node(text: &str) -> NodeRef {
    new_node_ref(NodeInner::new(NodeContent::Text(text.to_string())))
}

/// Creates a detached comment node.
pub fn new_comment_node(text: &str) -> NodeRef {
    new_node_ref(NodeInner::new(NodeContent::Comment(text.to_string())))
}

/// Creates an element node and appends the given children to it.
pub fn element_with_children(element: Element, children: Vec<NodeRef>) -> NodeRef {
    let node = new_element_node(element);
    for child in children {
        NodeInner::add_child_to_ref(&node, child);
    }
    node
}
