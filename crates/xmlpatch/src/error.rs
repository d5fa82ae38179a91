//! Error types for xmlpatch

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// What went wrong while reading markup
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    EmptyDocument,
    NoRootElement,
    MultipleRoots,
    TextOutsideRoot,
    UnexpectedEof,
    UnexpectedToken,
    InvalidName,
    InvalidAttribute,
    DuplicateAttribute { name: String },
    MismatchedTag { expected: String, found: String },
    UnexpectedClosingTag { name: String },
    UnclosedElement { name: String },
    InvalidEntity { entity: String },
    Unterminated { construct: &'static str },
    MisplacedDoctype,
    InvalidUtf8,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDocument => write!(f, "empty document"),
            Self::NoRootElement => write!(f, "no root element"),
            Self::MultipleRoots => write!(f, "more than one root element"),
            Self::TextOutsideRoot => write!(f, "text outside the root element"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::UnexpectedToken => write!(f, "unexpected token"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidAttribute => write!(f, "invalid attribute syntax"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::UnexpectedClosingTag { name } => write!(f, "unexpected closing tag </{name}>"),
            Self::UnclosedElement { name } => write!(f, "unclosed element <{name}>"),
            Self::InvalidEntity { entity } => write!(f, "invalid entity: &{entity};"),
            Self::Unterminated { construct } => write!(f, "unterminated {construct}"),
            Self::MisplacedDoctype => write!(f, "doctype must precede the root element"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Malformed input markup
#[derive(Error, Clone, Debug, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    span: Span,
    message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create error at specific position
    pub fn at(kind: ParseErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Tree content that cannot be written back as markup
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SerializeError {
    #[error("comment contains the comment terminator `-->`")]
    CommentTerminator,
    #[error("cdata section contains the cdata terminator `]]>`")]
    CDataTerminator,
    #[error("processing instruction contains the terminator `?>`")]
    ProcessingInstructionTerminator,
    #[error("processing instruction data starts with whitespace")]
    ProcessingInstructionLeadingWhitespace,
    #[error("invalid name: {name:?}")]
    InvalidName { name: String },
}

/// Textual node path that cannot be used for addressing
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("path {path:?} contains an empty segment")]
    EmptySegment { path: String },
}

/// Crate-wide error
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("no element at path {path}")]
    PathNotFound { path: String },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for xmlpatch
pub type Result<T, E = Error> = std::result::Result<T, E>;
