//! treemorph - In-place render tree reconciliation
//!
//! This library morphs a live render tree into the shape of a freshly rendered
//! one while keeping as many of the live node instances as possible. Keeping
//! instances matters because live nodes carry state that attributes do not
//! describe: what a user typed into a field, whether a box is checked, which
//! handlers are bound.
//!
//! # Overview
//!
//! Reconciliation walks both trees top-down. Two nodes are considered the same
//! logical entity when they share a non-empty identifier, or, lacking
//! identifiers, when they have the same kind and tag (plus the same content for
//! text and comments). Matched nodes are morphed in place; unmatched ones are
//! inserted, removed or replaced.
//!
//! - [`host`]: the [`HostNode`] trait the reconciler mutates through
//! - [`node`]: a reference in-memory tree implementing [`HostNode`]
//! - [`morph`]: the reconciler and its mutation log
//! - [`markup`]: XML/XHTML input and output for the reference tree
//!
//! # Example
//!
//! ```
//! use treemorph::{parse_str, print_to_string, Reconciler};
//!
//! let old = parse_str(r#"<ul><li id="a">A</li><li id="b">B</li></ul>"#).unwrap();
//! let new = parse_str(r#"<ul><li id="b">B</li><li id="a">A!</li></ul>"#).unwrap();
//!
//! let mut reconciler = Reconciler::new();
//! let morphed = reconciler.reconcile(Some(&new), Some(&old)).unwrap().unwrap();
//!
//! assert!(std::rc::Rc::ptr_eq(&morphed, &old));
//! assert_eq!(
//!     print_to_string(&old).unwrap(),
//!     "<ul>\n<li id=\"b\">B</li>\n<li id=\"a\">A!</li>\n</ul>\n"
//! );
//! ```

pub mod constants;
pub mod error;
pub mod host;
pub mod markup;
pub mod morph;
pub mod node;

// Re-export commonly used types
pub use error::{Error, Result};
pub use host::{AttrName, HostNode, LiveFlag, NodeType};
pub use markup::{
    parse_file, parse_str, print_to_string, print_to_string_pretty, MarkupParser, MarkupPrinter,
    PrinterOptions,
};
pub use morph::{
    is_same_entity, reconcile, BehaviorNames, BehaviorResolver, Mutation, MutationKind,
    MutationLog, Reconciler,
};
pub use node::{
    element_with_children, new_comment_node, new_element_node, new_text_node, Behavior, Element,
    LiveState, NodeContent, NodeInner, NodeRef, WeakNodeRef,
};
