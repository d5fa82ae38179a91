//! xmlpatch - parse markup into a tree, patch a node, write it back
//!
//! # Quick Start
//!
//! ```
//! use xmlpatch::{parse, serialize, NodePath};
//! # fn main() -> Result<(), xmlpatch::Error> {
//! let mut doc = parse(
//!     r#"<Manifest><TargetEndpoints><VersionInfo resourceName="old"/></TargetEndpoints></Manifest>"#,
//! )?;
//! let path: NodePath = "TargetEndpoints/VersionInfo".parse()?;
//! if let Some(info) = doc.resolve_path_mut(&path) {
//!     info.set_attribute("resourceName", "new default");
//! }
//! assert_eq!(
//!     serialize(&doc)?,
//!     r#"<Manifest><TargetEndpoints><VersionInfo resourceName="new default"/></TargetEndpoints></Manifest>"#,
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ParseError, ParseErrorKind, PathError, Pos, Result, SerializeError, Span};

pub mod cursor;
pub mod escape;

pub mod tree;
pub use tree::{Attributes, Document, Element, Node, NodePath, NodeRef};

pub mod parser;
pub use parser::{Config as ParserConfig, Parser};

pub mod serializer;
pub use serializer::{Config as SerializerConfig, EmptyElements, Serializer};

pub mod pipeline;
pub use pipeline::{BatchReport, FsSink, ItemOutcome, MemorySink, Pipeline, Sink};

pub mod source;
pub use source::{collect_sources, read_source, EnumerateOptions, SourceDocument};

/// Parse markup text with the default configuration
pub fn parse(s: &str) -> Result<Document, ParseError> {
    Parser::new(s.as_bytes()).parse()
}

/// Parse markup bytes with the default configuration
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    Parser::new(bytes).parse()
}

/// Parse with custom configuration
pub fn parse_with_config(s: &str, config: ParserConfig) -> Result<Document, ParseError> {
    Parser::with_config(s.as_bytes(), config).parse()
}

/// Serialize with the default configuration (empty elements self-close)
pub fn serialize(doc: &Document) -> Result<String, SerializeError> {
    Serializer::new().serialize(doc)
}

/// Serialize with custom configuration
pub fn serialize_with_config(doc: &Document, config: SerializerConfig) -> Result<String, SerializeError> {
    Serializer::with_config(config).serialize(doc)
}
