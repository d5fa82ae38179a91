//! Document: one root element plus surrounding top-level nodes

use crate::tree::node::{Element, Node};
use crate::tree::path::NodePath;

/// A parsed (or constructed) markup document
///
/// Holds exactly one root element. Nodes before it (declaration, doctype,
/// comments) form the prolog, nodes after it the epilog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Builder-style prolog append, e.g. an `<?xml ...?>` declaration
    pub fn with_prolog(mut self, node: Node) -> Self {
        self.prolog.push(node);
        self
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Top-level nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.prolog
            .iter()
            .map(NodeRef::Node)
            .chain(std::iter::once(NodeRef::Root(&self.root)))
            .chain(self.epilog.iter().map(NodeRef::Node))
    }

    /// The `<?xml ...?>` declaration, if present
    pub fn declaration(&self) -> Option<&str> {
        self.prolog.iter().find_map(|node| match node {
            Node::ProcessingInstruction { target, data } if target == "xml" => Some(data.as_str()),
            _ => None,
        })
    }

    /// Walk `path` from the root through first-matching child elements
    pub fn resolve_path(&self, path: &NodePath) -> Option<&Element> {
        path.segments()
            .iter()
            .try_fold(&self.root, |el, segment| el.child(segment))
    }

    pub fn resolve_path_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        path.segments()
            .iter()
            .try_fold(&mut self.root, |el, segment| el.child_mut(segment))
    }
}

/// Borrowed view of a top-level node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Node(&'a Node),
    Root(&'a Element),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Document {
        let version_info = Element::new("VersionInfo").with_attribute("resourceName", "old");
        let endpoints = Element::new("TargetEndpoints")
            .with_child(Node::text("note"))
            .with_child(version_info)
            .with_child(Element::new("VersionInfo").with_attribute("resourceName", "second"));
        Document::new(Element::new("Manifest").with_child(endpoints))
    }

    #[test]
    fn test_resolve_path() {
        let doc = manifest();
        let path = NodePath::new(["TargetEndpoints", "VersionInfo"]);
        let found = doc.resolve_path(&path).and_then(|el| el.attribute("resourceName"));
        assert_eq!(found, Some("old"));
    }

    #[test]
    fn test_resolve_empty_path_is_root() {
        let doc = manifest();
        assert_eq!(doc.resolve_path(&NodePath::root()).map(|el| el.name.as_str()), Some("Manifest"));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let doc = manifest();
        assert!(doc.resolve_path(&NodePath::new(["TargetEndpoints", "Nope"])).is_none());
        assert!(doc.resolve_path(&NodePath::new(["Nope", "VersionInfo"])).is_none());
    }

    #[test]
    fn test_resolve_does_not_descend_into_text() {
        let doc = manifest();
        assert!(doc.resolve_path(&NodePath::new(["TargetEndpoints", "note"])).is_none());
    }

    #[test]
    fn test_resolve_path_mut_updates_first_match() {
        let mut doc = manifest();
        let path = NodePath::new(["TargetEndpoints", "VersionInfo"]);
        if let Some(el) = doc.resolve_path_mut(&path) {
            el.set_attribute("resourceName", "new default");
        }
        let values: Vec<_> = doc
            .root()
            .child("TargetEndpoints")
            .into_iter()
            .flat_map(|el| el.children_named("VersionInfo"))
            .filter_map(|el| el.attribute("resourceName"))
            .collect();
        assert_eq!(values, ["new default", "second"]);
    }

    #[test]
    fn test_nodes_in_order() {
        let doc = Document::new(Element::new("r"))
            .with_prolog(Node::ProcessingInstruction {
                target: "xml".to_string(),
                data: "version=\"1.0\"".to_string(),
            })
            .with_prolog(Node::comment("c"));
        let kinds: Vec<_> = doc
            .nodes()
            .map(|node| matches!(node, NodeRef::Root(_)))
            .collect();
        assert_eq!(kinds, [false, false, true]);
        assert_eq!(doc.declaration(), Some("version=\"1.0\""));
    }
}
