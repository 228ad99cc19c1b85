//! Markup input and output for the reference tree.
//!
//! The reader turns an XML or XHTML fragment with a single root element into a
//! [`NodeRef`](crate::node::NodeRef) tree. Text is whitespace-normalized and
//! attribute names are namespace-resolved. The writer prints a tree back.

pub mod namespace;
mod parser;
mod printer;

pub use parser::{parse_file, parse_str, MarkupParser};
pub use printer::{print_to_string, print_to_string_pretty, MarkupPrinter, PrinterOptions};
