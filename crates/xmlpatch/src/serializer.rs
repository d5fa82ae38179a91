//! Markup serializer: document tree to text

use crate::cursor::is_whitespace;
use crate::error::SerializeError;
use crate::escape::{escape_attribute, escape_text, is_valid_name};
use crate::tree::{Document, Element, Node};

/// How elements without children are written
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyElements {
    /// `<a/>`
    #[default]
    SelfClose,
    /// `<a></a>`
    Expand,
}

/// Configuration for the markup serializer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub empty_elements: EmptyElements,
}

impl Config {
    pub const fn new(empty_elements: EmptyElements) -> Self {
        Self { empty_elements }
    }
}

/// Writes a document tree back to markup text.
///
/// Output is deterministic: attributes in map order, children in vector
/// order, no added indentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Serializer {
    config: Config,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> Config {
        self.config
    }

    pub fn serialize(&self, doc: &Document) -> Result<String, SerializeError> {
        let mut output = String::new();
        for node in &doc.prolog {
            self.write_node(node, &mut output)?;
        }
        self.write_element(&doc.root, &mut output)?;
        for node in &doc.epilog {
            self.write_node(node, &mut output)?;
        }
        Ok(output)
    }

    /// Serialize a single element subtree
    pub fn serialize_element(&self, element: &Element) -> Result<String, SerializeError> {
        let mut output = String::new();
        self.write_element(element, &mut output)?;
        Ok(output)
    }

    fn write_element(&self, element: &Element, output: &mut String) -> Result<(), SerializeError> {
        check_name(&element.name)?;
        output.push('<');
        output.push_str(&element.name);

        for (key, value) in &element.attributes {
            check_name(key)?;
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_attribute(value));
            output.push('"');
        }

        if element.children.is_empty() && self.config.empty_elements == EmptyElements::SelfClose {
            output.push_str("/>");
            return Ok(());
        }

        output.push('>');
        for child in &element.children {
            self.write_node(child, output)?;
        }
        output.push_str("</");
        output.push_str(&element.name);
        output.push('>');
        Ok(())
    }

    fn write_node(&self, node: &Node, output: &mut String) -> Result<(), SerializeError> {
        match node {
            Node::Element(element) => self.write_element(element, output)?,
            Node::Text(text) => output.push_str(&escape_text(text)),
            Node::CData(text) => {
                if text.contains("]]>") {
                    return Err(SerializeError::CDataTerminator);
                }
                output.push_str("<![CDATA[");
                output.push_str(text);
                output.push_str("]]>");
            }
            Node::Comment(text) => {
                if text.contains("-->") {
                    return Err(SerializeError::CommentTerminator);
                }
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            Node::ProcessingInstruction { target, data } => {
                check_name(target)?;
                if data.contains("?>") {
                    return Err(SerializeError::ProcessingInstructionTerminator);
                }
                // the separator after the target swallows any leading whitespace
                if data.bytes().next().is_some_and(is_whitespace) {
                    return Err(SerializeError::ProcessingInstructionLeadingWhitespace);
                }
                output.push_str("<?");
                output.push_str(target);
                if !data.is_empty() {
                    output.push(' ');
                    output.push_str(data);
                }
                output.push_str("?>");
            }
            Node::Doctype(body) => {
                output.push_str("<!DOCTYPE ");
                output.push_str(body);
                output.push('>');
            }
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), SerializeError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(SerializeError::InvalidName {
            name: name.to_string(),
        })
    }
}
