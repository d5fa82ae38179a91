//! Nodes and elements

use indexmap::IndexMap;

/// Attribute map; iteration order is insertion order
pub type Attributes = IndexMap<String, String>;

/// A node of the document tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
    /// Opaque `<!DOCTYPE ...>` body, never interpreted
    Doctype(String),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn cdata(value: impl Into<String>) -> Self {
        Self::CData(value.into())
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Self::Comment(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// First child element named `name`; `None` for non-element nodes
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.as_element()?.child(name)
    }

    /// Whether this is a text node holding only whitespace
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// A tagged node owning its attributes and children
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push_child(child);
        self
    }

    /// First child element named `name`, in document order
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find(|el| el.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|el| el.name == name)
    }

    /// All child elements named `name`, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .filter(move |el| el.name == name)
    }

    /// All child elements
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Insert or overwrite an attribute and return the previous value.
    ///
    /// New names go after every existing attribute; an existing name keeps
    /// its position.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Remove an attribute, keeping the order of the others
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Concatenated text and cdata content of the direct children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all text and cdata children with a single text node.
    ///
    /// The new node takes the slot of the first text child, or is appended
    /// when there was none.
    pub fn set_text(&mut self, value: impl Into<String>) {
        let slot = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Text(_) | Node::CData(_)));
        self.children
            .retain(|node| !matches!(node, Node::Text(_) | Node::CData(_)));
        let node = Node::Text(value.into());
        match slot {
            Some(index) => self.children.insert(index, node),
            None => self.children.push(node),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("root")
            .with_child(Node::comment("first"))
            .with_child(Element::new("item").with_attribute("id", "1"))
            .with_child(Element::new("other"))
            .with_child(Element::new("item").with_attribute("id", "2"))
    }

    #[test]
    fn test_child_returns_first_match() {
        let root = sample();
        assert_eq!(root.child("item").and_then(|el| el.attribute("id")), Some("1"));
        assert!(root.child("missing").is_none());
    }

    #[test]
    fn test_child_is_case_sensitive() {
        let root = sample();
        assert!(root.child("Item").is_none());
    }

    #[test]
    fn test_children_named_in_document_order() {
        let root = sample();
        let ids: Vec<_> = root
            .children_named("item")
            .filter_map(|el| el.attribute("id"))
            .collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(root.elements().count(), 3);
    }

    #[test]
    fn test_child_on_non_element_node() {
        assert!(Node::text("x").child("item").is_none());
        assert!(Node::Element(sample()).child("other").is_some());
    }

    #[test]
    fn test_set_attribute_appends_new_names() {
        let mut el = Element::new("a").with_attribute("x", "1").with_attribute("y", "2");
        assert_eq!(el.set_attribute("z", "3"), None);
        let names: Vec<_> = el.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[test]
    fn test_set_attribute_overwrites_in_place() {
        let mut el = Element::new("a").with_attribute("x", "1").with_attribute("y", "2");
        assert_eq!(el.set_attribute("x", "9"), Some("1".to_string()));
        let pairs: Vec<_> = el
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, [("x", "9"), ("y", "2")]);
    }

    #[test]
    fn test_set_attribute_is_idempotent() {
        let mut once = Element::new("a").with_attribute("x", "1");
        once.set_attribute("k", "v");
        let mut twice = once.clone();
        twice.set_attribute("k", "v");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_attribute_keeps_order() {
        let mut el = Element::new("a")
            .with_attribute("x", "1")
            .with_attribute("y", "2")
            .with_attribute("z", "3");
        assert_eq!(el.remove_attribute("y"), Some("2".to_string()));
        assert_eq!(el.remove_attribute("y"), None);
        let names: Vec<_> = el.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, ["x", "z"]);
    }

    #[test]
    fn test_text_concatenates_text_and_cdata() {
        let el = Element::new("a")
            .with_child(Node::text("one "))
            .with_child(Element::new("b"))
            .with_child(Node::cdata("<two>"));
        assert_eq!(el.text(), "one <two>");
    }

    #[test]
    fn test_set_text_replaces_in_first_slot() {
        let mut el = Element::new("a")
            .with_child(Element::new("b"))
            .with_child(Node::text("old"))
            .with_child(Node::comment("c"))
            .with_child(Node::cdata("more"));
        el.set_text("new");
        assert_eq!(
            el.children,
            vec![
                Node::Element(Element::new("b")),
                Node::text("new"),
                Node::comment("c"),
            ]
        );
    }

    #[test]
    fn test_set_text_appends_when_no_text() {
        let mut el = Element::new("a");
        el.set_text("value");
        assert_eq!(el.children, vec![Node::text("value")]);
        assert!(!el.is_empty());
    }
}
