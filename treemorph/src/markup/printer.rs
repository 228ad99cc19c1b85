//! Markup writer for render trees.
//!
//! Output is deterministic: attributes are written in [`AttrName`] order, and
//! namespaced attributes get a prefix declared on the element that first needs
//! it unless an ancestor already declared one.

use std::io::Write;

use super::namespace::well_known_prefix;
use crate::constants::{XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::host::AttrName;
use crate::node::{Element, NodeContent, NodeRef};

/// Options for markup printing.
#[derive(Debug, Clone, Default)]
pub struct PrinterOptions {
    /// Whether to pretty-print with indentation.
    pub pretty_print: bool,
}

/// Markup printer that outputs render trees.
pub struct MarkupPrinter<W: Write> {
    writer: W,
    options: PrinterOptions,
    indent: usize,
    /// State tracking for proper tag closing
    state: PrintState,
    /// Stack of "has content" flags for each element level
    content_stack: Vec<bool>,
    /// Whether current element has content
    has_content: bool,
    /// Prefix bindings (prefix, uri) per open element
    scopes: Vec<Vec<(String, String)>>,
    generated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PrintState {
    Initial,
    AfterTag,
    AfterChars,
}

impl<W: Write> MarkupPrinter<W> {
    /// Creates a new printer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, PrinterOptions::default())
    }

    /// Creates a new printer with the given options.
    pub fn with_options(writer: W, options: PrinterOptions) -> Self {
        MarkupPrinter {
            writer,
            options,
            indent: 0,
            state: PrintState::Initial,
            content_stack: Vec::new(),
            has_content: true,
            scopes: Vec::new(),
            generated: 0,
        }
    }

    /// Prints a tree as a markup fragment.
    pub fn print(&mut self, root: &NodeRef) -> std::io::Result<()> {
        self.print_node(root)?;
        if !self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }

    /// Prints a tree preceded by an XML declaration.
    pub fn print_document(&mut self, root: &NodeRef) -> std::io::Result<()> {
        write!(self.writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        if self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.state = PrintState::AfterTag;
        self.print(root)
    }

    fn print_node(&mut self, node: &NodeRef) -> std::io::Result<()> {
        let borrowed = node.borrow();

        match borrowed.content() {
            NodeContent::Text(text) => self.characters(text)?,
            NodeContent::Comment(comment) => {
                self.close_pending_tag()?;
                self.print_with_nl(&format!(
                    "{}<!-- {} -->",
                    Self::indent_str(self.indent),
                    comment
                ))?;
            }
            NodeContent::Element(element) => {
                self.start_element(element)?;
                for child in borrowed.children() {
                    self.print_node(child)?;
                }
                self.end_element(element.name())?;
            }
        }

        Ok(())
    }

    fn start_element(&mut self, element: &Element) -> std::io::Result<()> {
        self.close_pending_tag()?;

        // In non-pretty mode, add newline between tags
        if self.state == PrintState::AfterTag && !self.options.pretty_print {
            writeln!(self.writer)?;
        }

        self.scopes.push(declared_prefixes(element));

        let mut tag = String::new();
        tag.push('<');
        tag.push_str(element.name());

        let mut extra_decls = Vec::new();
        for (name, value) in element.attributes() {
            let qname = self.qualified_name(name, &mut extra_decls);
            push_attribute(&mut tag, &qname, value);
        }
        for (prefix, uri) in extra_decls {
            push_attribute(&mut tag, &format!("xmlns:{}", prefix), &uri);
        }

        if self.options.pretty_print {
            write!(self.writer, "{}", &Self::indent_str(self.indent))?;
        }
        write!(self.writer, "{}", tag)?;

        self.content_stack.push(self.has_content);
        self.has_content = false;
        self.indent += 1;
        self.state = PrintState::AfterTag;

        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.scopes.pop();

        if !self.has_content {
            self.print_with_nl(" />")?;
        } else {
            if self.state == PrintState::AfterTag && !self.options.pretty_print {
                writeln!(self.writer)?;
            }
            if self.options.pretty_print {
                write!(self.writer, "{}", &Self::indent_str(self.indent))?;
            }
            self.print_with_nl(&format!("</{}>", name))?;
        }

        self.has_content = self.content_stack.pop().unwrap_or(true);
        self.state = PrintState::AfterTag;

        Ok(())
    }

    fn characters(&mut self, text: &str) -> std::io::Result<()> {
        self.close_pending_tag()?;
        self.state = PrintState::AfterChars;

        if text.is_empty() {
            return Ok(());
        }
        if self.options.pretty_print {
            write!(self.writer, "{}", &Self::indent_str(self.indent))?;
        }
        self.print_with_nl(&to_entities(text))
    }

    /// Finishes an open start tag once the element turns out to have content.
    fn close_pending_tag(&mut self) -> std::io::Result<()> {
        if !self.has_content {
            self.print_with_nl(">")?;
            self.has_content = true;
        }
        Ok(())
    }

    /// Returns the name an attribute is written under, binding a prefix on the
    /// current element when no open element has one for its namespace.
    fn qualified_name(&mut self, name: &AttrName, extra: &mut Vec<(String, String)>) -> String {
        let Some(uri) = name.namespace.as_deref() else {
            return name.local_name.clone();
        };
        if uri == XMLNS_NAMESPACE {
            return if name.local_name == "xmlns" {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", name.local_name)
            };
        }
        if uri == XML_NAMESPACE {
            return format!("xml:{}", name.local_name);
        }

        let bound = self
            .scopes
            .iter()
            .rev()
            .flatten()
            .chain(extra.iter())
            .find(|(prefix, bound_uri)| !prefix.is_empty() && bound_uri == uri)
            .map(|(prefix, _)| prefix.clone());
        let prefix = match bound {
            Some(prefix) => prefix,
            None => {
                let prefix = match well_known_prefix(uri) {
                    Some(prefix) if !self.prefix_in_use(prefix, extra) => prefix.to_string(),
                    _ => self.generate_prefix(extra),
                };
                extra.push((prefix.clone(), uri.to_string()));
                prefix
            }
        };
        format!("{}:{}", prefix, name.local_name)
    }

    fn prefix_in_use(&self, prefix: &str, extra: &[(String, String)]) -> bool {
        self.scopes
            .iter()
            .flatten()
            .chain(extra.iter())
            .any(|(bound, _)| bound == prefix)
    }

    fn generate_prefix(&mut self, extra: &[(String, String)]) -> String {
        loop {
            self.generated += 1;
            let prefix = format!("ns{}", self.generated);
            if !self.prefix_in_use(&prefix, extra) {
                return prefix;
            }
        }
    }

    fn print_with_nl(&mut self, s: &str) -> std::io::Result<()> {
        if self.options.pretty_print {
            writeln!(self.writer, "{}", s)
        } else {
            write!(self.writer, "{}", s)
        }
    }

    fn indent_str(level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Collects the prefix declarations an element carries as attributes.
fn declared_prefixes(element: &Element) -> Vec<(String, String)> {
    element
        .attributes()
        .iter()
        .filter(|(name, _)| {
            name.namespace.as_deref() == Some(XMLNS_NAMESPACE) && name.local_name != "xmlns"
        })
        .map(|(name, uri)| (name.local_name.clone(), uri.clone()))
        .collect()
}

fn push_attribute(tag: &mut String, qname: &str, value: &str) {
    tag.push(' ');
    tag.push_str(qname);
    tag.push_str("=\"");
    tag.push_str(&to_entities(value));
    tag.push('"');
}

/// Converts special characters to XML entities.
fn to_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("&apos;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Prints a tree to a string.
pub fn print_to_string(root: &NodeRef) -> std::io::Result<String> {
    let mut output = Vec::new();
    MarkupPrinter::new(&mut output).print(root)?;
    Ok(String::from_utf8_lossy(&output).to_string())
}

/// Prints a tree to a string with pretty printing.
pub fn print_to_string_pretty(root: &NodeRef) -> std::io::Result<String> {
    let mut output = Vec::new();
    let options = PrinterOptions { pretty_print: true };
    MarkupPrinter::with_options(&mut output, options).print(root)?;
    Ok(String::from_utf8_lossy(&output).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::XLINK_NAMESPACE;
    use crate::host::HostNode;
    use crate::markup::parse_str;
    use crate::node::{element_with_children, new_element_node, new_text_node};

    /// Compares element names, attributes and text content.
    fn trees_equal(a: &NodeRef, b: &NodeRef) -> bool {
        let a_borrowed = a.borrow();
        let b_borrowed = b.borrow();

        let same_content = match (a_borrowed.content(), b_borrowed.content()) {
            (NodeContent::Element(ea), NodeContent::Element(eb)) => {
                ea.name() == eb.name() && ea.attributes() == eb.attributes()
            }
            (ca, cb) => ca.node_type() == cb.node_type() && ca.value() == cb.value(),
        };

        same_content
            && a_borrowed.child_count() == b_borrowed.child_count()
            && a_borrowed
                .children()
                .iter()
                .zip(b_borrowed.children())
                .all(|(child_a, child_b)| trees_equal(child_a, child_b))
    }

    fn round_trip(markup: &str) -> bool {
        let tree1 = parse_str(markup).unwrap();
        let output = print_to_string(&tree1).unwrap();
        let tree2 = parse_str(&output).unwrap();
        trees_equal(&tree1, &tree2)
    }

    #[test]
    fn test_print_simple() {
        let root = parse_str("<root>text</root>").unwrap();
        assert_eq!(print_to_string(&root).unwrap(), "<root>text</root>\n");
    }

    #[test]
    fn test_print_document_declaration() {
        let root = parse_str("<root/>").unwrap();
        let mut output = Vec::new();
        MarkupPrinter::new(&mut output).print_document(&root).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(output.contains("<root />"));
    }

    #[test]
    fn test_print_empty_element() {
        let root = parse_str("<root><empty /></root>").unwrap();
        let output = print_to_string(&root).unwrap();
        assert!(output.contains("<empty />"));
    }

    #[test]
    fn test_attributes_are_sorted_and_escaped() {
        let root = new_element_node(
            Element::new("a")
                .attr("title", "x \"y\" & z")
                .attr("href", "/p"),
        );
        let output = print_to_string(&root).unwrap();
        assert_eq!(
            output,
            "<a href=\"/p\" title=\"x &quot;y&quot; &amp; z\" />\n"
        );
    }

    #[test]
    fn test_pretty_print() {
        let root = parse_str("<root><child>text</child></root>").unwrap();
        let output = print_to_string_pretty(&root).unwrap();
        assert!(output.contains("  <child>"));
        assert!(output.contains("    text"));
    }

    #[test]
    fn test_comment() {
        let root = parse_str("<root><!--note--><a/></root>").unwrap();
        let output = print_to_string(&root).unwrap();
        assert!(output.contains("<!-- note -->"));
    }

    #[test]
    fn test_declared_prefix_is_reused() {
        let markup =
            r##"<svg xmlns:l="http://www.w3.org/1999/xlink"><use l:href="#a"/></svg>"##;
        let root = parse_str(markup).unwrap();
        let output = print_to_string(&root).unwrap();

        assert!(output.contains(r#"xmlns:l="http://www.w3.org/1999/xlink""#));
        assert!(output.contains(r##"l:href="#a""##));
        assert!(!output.contains("xmlns:xlink"));
    }

    #[test]
    fn test_undeclared_namespace_gets_declaration() {
        let mut element = Element::new("use");
        element.set_attribute(AttrName::namespaced(XLINK_NAMESPACE, "href"), "#a".to_string());
        element.set_attribute(AttrName::namespaced("urn:custom", "k"), "v".to_string());
        let root = new_element_node(element);

        let output = print_to_string(&root).unwrap();
        assert!(output.contains(r##"xlink:href="#a""##));
        assert!(output.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(output.contains(r#"ns1:k="v""#));
        assert!(output.contains(r#"xmlns:ns1="urn:custom""#));

        let reparsed = parse_str(&output).unwrap();
        assert_eq!(
            reparsed.attribute(&AttrName::namespaced("urn:custom", "k")),
            Some("v".to_string())
        );
    }

    #[test]
    fn test_print_built_tree() {
        let root = element_with_children(
            Element::new("ul"),
            vec![element_with_children(
                Element::new("li"),
                vec![new_text_node("a < b")],
            )],
        );
        assert_eq!(
            print_to_string(&root).unwrap(),
            "<ul>\n<li>a &lt; b</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_round_trips() {
        assert!(round_trip("<root>text</root>"));
        assert!(round_trip(
            r#"<root id="foo" class="bar"><child name="test">content</child></root>"#
        ));
        assert!(round_trip("<root>text1<child>inner</child>text2</root>"));
        assert!(round_trip("<root><empty /><also-empty></also-empty></root>"));
        assert!(round_trip(
            r#"<root attr="&amp;&lt;&gt;&apos;&quot;">text with &amp; and &lt;tag&gt;</root>"#
        ));
        assert!(round_trip(
            r#"<form><input type="checkbox" checked=""/><!-- c --><p>x</p></form>"#
        ));
    }

    #[test]
    fn test_double_round_trip() {
        let markup = r#"<doc><section id="s1"><para>First.</para><para>Second.</para></section></doc>"#;
        let output1 = print_to_string(&parse_str(markup).unwrap()).unwrap();
        let output2 = print_to_string(&parse_str(&output1).unwrap()).unwrap();
        assert_eq!(output1, output2);
    }
}
