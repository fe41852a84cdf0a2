//! Minimal XML serializer that only writes to paths.
//!
//! It knows nothing about handles or registries: like any path-only API it
//! opens its target through a [`SchemeTable`]. Pointing it at a synthetic
//! path makes it write into a caller-owned buffer.

use crate::error::{ProxyError, Result};
use crate::scheme::SchemeTable;

/// Child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// XML element with attributes and children, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element
    ///
    /// # Errors
    /// * `InvalidInput` when `name` is not a usable XML name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        self.attributes.push((name, value.into()));
        Ok(self)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serialize without an XML declaration
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, out);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_into(out),
                Node::Text(text) => escape_into(text, out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_alphabetic() || c == '_' || c == ':');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'));
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(ProxyError::invalid_input(format!("invalid XML name: {:?}", name)))
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

/// Serialize `root` to `path`
///
/// Opens `path` for writing through `table`, writes the document, flushes and
/// closes the stream. Returns the number of bytes written.
pub fn write_document(table: &SchemeTable, path: &str, root: &Element) -> Result<usize> {
    let xml = root.to_xml();
    let mut stream = table.open(path, "w")?;
    let written = stream.write(xml.as_bytes())?;
    stream.flush()?;
    stream.close()?;
    Ok(written)
}
