//! Error types for treemorph.

use thiserror::Error;

/// Result type alias for treemorph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading trees or reconciling them.
#[derive(Error, Debug)]
pub enum Error {
    /// The top-level arguments to a reconcile call cannot be reconciled.
    ///
    /// Raised before any mutation of the old tree takes place.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Markup parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
