//! Markup reader that builds render trees.
//!
//! This reader uses quick-xml's streaming API to build a [`NodeRef`] tree from
//! an XML or XHTML fragment with exactly one root element.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::namespace::{is_xmlns_attr, split_qname, NamespaceContext};
use crate::error::{Error, Result};
use crate::node::{new_comment_node, new_element_node, new_text_node, Element, NodeInner, NodeRef};

/// Markup reader that builds render trees.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    keep_comments: bool,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser {
    /// Creates a parser that keeps comments.
    pub fn new() -> Self {
        MarkupParser {
            keep_comments: true,
        }
    }

    /// Sets whether comments become comment nodes or are dropped.
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Parses markup from a string.
    pub fn parse_str(&self, markup: &str) -> Result<NodeRef> {
        let mut reader = Reader::from_str(markup);
        // Whitespace is normalized by the reader itself
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses markup from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<NodeRef> {
        let file = File::open(path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<NodeRef> {
        let mut state = BuildState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    state.flush_text();
                    let node = self.parse_element(e, reader, &mut state.namespaces)?;
                    state.open(node)?;
                }
                Ok(Event::End(_)) => {
                    state.flush_text();
                    state.close();
                }
                Ok(Event::Empty(ref e)) => {
                    state.flush_text();
                    let node = self.parse_element(e, reader, &mut state.namespaces)?;
                    state.open(node)?;
                    state.close();
                }
                Ok(Event::Text(e)) => {
                    let raw =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                    state.push_text(&text);
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(e.as_ref());
                    state.push_text(&text);
                }
                Ok(Event::GeneralRef(e)) => {
                    if let Some(c) = e
                        .resolve_char_ref()
                        .map_err(|e| Error::Parse(e.to_string()))?
                    {
                        state.push_text(c.encode_utf8(&mut [0; 4]));
                    } else {
                        let name = e.decode().map_err(|e| Error::Parse(e.to_string()))?;
                        let resolved = resolve_predefined_entity(&name).ok_or_else(|| {
                            Error::Parse(format!("Unknown entity reference: &{};", name))
                        })?;
                        state.push_text(resolved);
                    }
                }
                Ok(Event::Comment(ref e)) => {
                    if self.keep_comments {
                        state.flush_text();
                        let text = String::from_utf8_lossy(e.as_ref());
                        state.leaf(new_comment_node(text.trim()));
                    }
                }
                Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e)),
            }
            buf.clear();
        }

        state.finish()
    }

    /// Parses an element's name and attributes, entering its namespace scope.
    fn parse_element<R: BufRead>(
        &self,
        e: &BytesStart,
        reader: &Reader<R>,
        namespaces: &mut NamespaceContext,
    ) -> Result<NodeRef> {
        let name = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let mut raw = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            raw.push((key, value));
        }

        // Declarations on this element are in scope for its own attributes
        namespaces.push_scope();
        for (key, value) in raw.iter().filter(|(key, _)| is_xmlns_attr(key)) {
            let prefix = match split_qname(key) {
                (Some(_), local) => local,
                (None, _) => "",
            };
            namespaces.bind(prefix, value);
        }

        let attributes: BTreeMap<_, _> = raw
            .into_iter()
            .map(|(key, value)| (namespaces.resolve_attr(&key), value))
            .collect();

        Ok(new_element_node(Element::with_attributes(name, attributes)))
    }
}

/// Tree-building state for one parse.
#[derive(Default)]
struct BuildState {
    root: Option<NodeRef>,
    stack: Vec<NodeRef>,
    namespaces: NamespaceContext,
    current_text: Option<String>,
}

impl BuildState {
    /// Attaches an element and makes it the current parent.
    fn open(&mut self, node: NodeRef) -> Result<()> {
        match self.stack.last() {
            Some(parent) => NodeInner::add_child_to_ref(parent, node.clone()),
            None if self.root.is_some() => {
                return Err(Error::InvalidInput(
                    "markup has more than one root element".to_string(),
                ))
            }
            None => self.root = Some(node.clone()),
        }
        self.stack.push(node);
        Ok(())
    }

    /// Leaves the current element.
    fn close(&mut self) {
        self.stack.pop();
        self.namespaces.pop_scope();
    }

    /// Attaches a leaf to the current parent. Leaves outside the root are dropped.
    fn leaf(&mut self, node: NodeRef) {
        if let Some(parent) = self.stack.last() {
            NodeInner::add_child_to_ref(parent, node);
        }
    }

    /// Accumulates text, collapsing whitespace runs to a single space.
    fn push_text(&mut self, text: &str) {
        let mut last_was_ws = self
            .current_text
            .as_deref()
            .map_or(true, |p| p.ends_with(' '));
        let mut result = String::new();

        for c in text.chars() {
            if c.is_whitespace() {
                if !last_was_ws {
                    result.push(' ');
                    last_was_ws = true;
                }
            } else {
                result.push(c);
                last_was_ws = false;
            }
        }

        if !result.is_empty() {
            self.current_text
                .get_or_insert_with(String::new)
                .push_str(&result);
        }
    }

    /// Turns accumulated text into a text node.
    fn flush_text(&mut self) {
        if let Some(text) = self.current_text.take() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                self.leaf(new_text_node(trimmed));
            }
        }
    }

    fn finish(mut self) -> Result<NodeRef> {
        self.flush_text();
        if let Some(open) = self.stack.last() {
            return Err(Error::Parse(format!(
                "Unclosed element at end of input: {}",
                open.borrow().element().map(Element::name).unwrap_or_default()
            )));
        }
        let root = self
            .root
            .ok_or_else(|| Error::InvalidInput("markup has no root element".to_string()))?;
        debug!("parsed tree rooted at node {}", root.borrow().id());
        Ok(root)
    }
}

/// Parses markup from a file with the default parser.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<NodeRef> {
    MarkupParser::new().parse_file(path)
}

/// Parses markup from a string with the default parser.
pub fn parse_str(markup: &str) -> Result<NodeRef> {
    MarkupParser::new().parse_str(markup)
}
