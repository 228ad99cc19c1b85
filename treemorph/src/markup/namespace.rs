//! Namespace handling for markup attributes.

use std::collections::HashMap;

use crate::constants::{XLINK_NAMESPACE, XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::host::AttrName;

/// Tracks namespace bindings while reading markup.
pub struct NamespaceContext {
    /// Stack of scopes, each containing prefix -> URI bindings.
    scopes: Vec<HashMap<String, String>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a new namespace context with the `xml` prefix pre-bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            scopes: vec![HashMap::new()],
        };
        ctx.bind("xml", XML_NAMESPACE);
        ctx
    }

    /// Pushes a new scope for entering an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the current scope when leaving an element.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri.to_string());
        }
    }

    /// Resolves a prefix to its URI, searching from innermost scope.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix))
            .map(String::as_str)
    }

    /// Resolves a qualified attribute name to an [`AttrName`].
    ///
    /// Unprefixed attributes are in no namespace (the default namespace does
    /// not apply to attributes). Namespace declarations land in the xmlns
    /// namespace. Unbound prefixes are kept as part of the local name.
    pub fn resolve_attr(&self, qname: &str) -> AttrName {
        if qname == "xmlns" {
            return AttrName::namespaced(XMLNS_NAMESPACE, "xmlns");
        }
        match split_qname(qname) {
            (Some("xmlns"), local) => AttrName::namespaced(XMLNS_NAMESPACE, local),
            (Some(prefix), local) => match self.resolve(prefix) {
                Some(uri) => AttrName::namespaced(uri, local),
                None => AttrName::local(qname),
            },
            (None, local) => AttrName::local(local),
        }
    }
}

/// Splits a qualified name into prefix and local name.
///
/// Returns (Some(prefix), local) for "prefix:local"
/// Returns (None, name) for "name" without prefix
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Checks if an attribute name is a namespace declaration.
pub fn is_xmlns_attr(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// Returns the conventional prefix of a well-known namespace.
pub fn well_known_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        XML_NAMESPACE => Some("xml"),
        XMLNS_NAMESPACE => Some("xmlns"),
        XLINK_NAMESPACE => Some("xlink"),
        _ => None,
    }
}
