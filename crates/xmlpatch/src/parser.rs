//! Markup parser: text to document tree

pub mod tokenizer;

pub use tokenizer::{Token, Tokenizer};

use tracing::{debug, trace};

use crate::error::{ParseError, ParseErrorKind, Span};
use crate::tree::{Document, Element, Node};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Configuration for the markup parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
    /// Keep whitespace-only text runs instead of dropping them
    pub preserve_whitespace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
            preserve_whitespace: false,
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            preserve_whitespace: false,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
            preserve_whitespace: false,
        }
    }

    pub const fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }
}

/// Builds a [`Document`] from tokens using an explicit element stack
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
    config: Config,
}

/// Where finished nodes go while the document is being assembled
#[derive(Debug, Default)]
struct Assembly {
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
    open: Vec<Element>,
}

impl Assembly {
    /// Attach a node to the innermost open element, or to the top level
    fn attach(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None if self.root.is_some() => self.epilog.push(node),
            None => self.prolog.push(node),
        }
    }

    fn close(&mut self, element: Element) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => self.root = Some(element),
        }
    }

    fn at_top_level(&self) -> bool {
        self.open.is_empty()
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        Self {
            input,
            tokenizer: Tokenizer::new(input),
            config,
        }
    }

    /// Parse a complete document
    pub fn parse(&mut self) -> Result<Document, ParseError> {
        if self.config.max_size != 0 && self.input.len() > self.config.max_size {
            return Err(ParseError::new(
                ParseErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::empty(),
            ));
        }
        if self.input.iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::at(
                ParseErrorKind::EmptyDocument,
                self.tokenizer.position(),
            ));
        }

        let mut doc = Assembly::default();
        while let Some((token, span)) = self.tokenizer.next_token()? {
            trace!(?token, start = %span.start, "token");
            self.apply(&mut doc, token, span)?;
        }

        if let Some(open) = doc.open.last() {
            return Err(ParseError::at(
                ParseErrorKind::UnclosedElement {
                    name: open.name.clone(),
                },
                self.tokenizer.position(),
            ));
        }
        let Some(root) = doc.root else {
            return Err(ParseError::at(
                ParseErrorKind::NoRootElement,
                self.tokenizer.position(),
            ));
        };

        debug!(root = %root.name, bytes = self.input.len(), "parsed document");
        Ok(Document {
            prolog: doc.prolog,
            root,
            epilog: doc.epilog,
        })
    }

    fn apply(&self, doc: &mut Assembly, token: Token, span: Span) -> Result<(), ParseError> {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                if doc.at_top_level() && doc.root.is_some() {
                    return Err(ParseError::new(ParseErrorKind::MultipleRoots, span));
                }
                let depth = doc.open.len() + 1;
                if self.config.max_depth != 0 && depth > usize::from(self.config.max_depth) {
                    return Err(ParseError::new(
                        ParseErrorKind::MaxDepthExceeded {
                            max: self.config.max_depth,
                        },
                        span,
                    ));
                }

                let element = Element {
                    name,
                    attributes,
                    children: Vec::new(),
                };
                if self_closing {
                    doc.close(element);
                } else {
                    doc.open.push(element);
                }
            }
            Token::EndTag { name } => {
                let Some(open) = doc.open.pop() else {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedClosingTag { name },
                        span,
                    ));
                };
                if open.name != name {
                    return Err(ParseError::new(
                        ParseErrorKind::MismatchedTag {
                            expected: open.name,
                            found: name,
                        },
                        span,
                    ));
                }
                doc.close(open);
            }
            Token::Text(text) => {
                let blank = text.trim().is_empty();
                if doc.at_top_level() && !blank {
                    return Err(ParseError::new(ParseErrorKind::TextOutsideRoot, span));
                }
                if !blank || self.config.preserve_whitespace {
                    doc.attach(Node::Text(text));
                }
            }
            Token::CData(text) => {
                if doc.at_top_level() {
                    return Err(ParseError::new(ParseErrorKind::TextOutsideRoot, span));
                }
                doc.attach(Node::CData(text));
            }
            Token::Comment(text) => doc.attach(Node::Comment(text)),
            Token::ProcessingInstruction { target, data } => {
                doc.attach(Node::ProcessingInstruction { target, data });
            }
            Token::Doctype(body) => {
                if !doc.at_top_level() || doc.root.is_some() {
                    return Err(ParseError::new(ParseErrorKind::MisplacedDoctype, span));
                }
                doc.attach(Node::Doctype(body));
            }
        }
        Ok(())
    }
}
