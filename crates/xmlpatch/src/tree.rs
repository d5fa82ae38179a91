//! In-memory document tree with navigation and in-place mutation

pub mod document;
pub mod node;
pub mod path;

pub use document::{Document, NodeRef};
pub use node::{Attributes, Element, Node};
pub use path::NodePath;
