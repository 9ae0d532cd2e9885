//! Generic document tree with source lines.

use crate::Tag;

/// Structural shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A node of a parsed YAML document.
///
/// Every node carries its [`Tag`], its raw scalar text and the position of
/// its first token. Collections own their children in source order; for
/// mappings the children are key/value [`MappingEntry`] pairs.
///
/// The tree is read-only once built. A field that does not exist is
/// represented by `None` from [`Node::field`], never by a placeholder node.
///
/// ## Example
///
/// ```rust
/// use podlint_yaml::{parse, NodeKind};
///
/// let doc = parse("spec:\n  containers: []\n").unwrap();
/// let containers = doc.field("spec").and_then(|s| s.field("containers")).unwrap();
/// assert_eq!(containers.kind, NodeKind::Sequence);
/// assert!(containers.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,

    /// Semantic type label.
    pub tag: Tag,

    /// Raw scalar text. Empty for sequences and mappings.
    pub value: String,

    /// Source line (1-based).
    pub line: usize,

    /// Source column (1-based, in characters).
    pub column: usize,

    children: Children,
}

#[derive(Debug, Clone, PartialEq)]
enum Children {
    None,
    Sequence(Vec<Node>),
    Mapping(Vec<MappingEntry>),
}

/// A key/value pair of a mapping node.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: Node,
    pub value: Node,
}

impl Node {
    /// Create a scalar node.
    pub fn scalar(tag: Tag, value: impl Into<String>, line: usize) -> Self {
        Self {
            kind: NodeKind::Scalar,
            tag,
            value: value.into(),
            line,
            column: 1,
            children: Children::None,
        }
    }

    /// Create a sequence node from its items.
    pub fn sequence(items: Vec<Node>, line: usize) -> Self {
        Self {
            kind: NodeKind::Sequence,
            tag: Tag::Sequence,
            value: String::new(),
            line,
            column: 1,
            children: Children::Sequence(items),
        }
    }

    /// Create a mapping node from its entries.
    pub fn mapping(entries: Vec<MappingEntry>, line: usize) -> Self {
        Self {
            kind: NodeKind::Mapping,
            tag: Tag::Mapping,
            value: String::new(),
            line,
            column: 1,
            children: Children::Mapping(entries),
        }
    }

    /// Set the source column.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == NodeKind::Scalar
    }

    pub fn is_sequence(&self) -> bool {
        self.kind == NodeKind::Sequence
    }

    pub fn is_mapping(&self) -> bool {
        self.kind == NodeKind::Mapping
    }

    /// Get the items if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.children {
            Children::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entries if this is a mapping.
    pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
        match &self.children {
            Children::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a field of a mapping by key.
    ///
    /// Returns the value paired with the first scalar key whose text equals
    /// `key`. Any node that is not a mapping has no fields, so the result is
    /// `None` rather than an error; callers decide whether absence matters.
    pub fn field(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|entry| entry.key.is_scalar() && entry.key.value == key)
            .map(|entry| &entry.value)
    }

    /// Number of children (sequence items or mapping entries).
    pub fn len(&self) -> usize {
        match &self.children {
            Children::None => 0,
            Children::Sequence(items) => items.len(),
            Children::Mapping(entries) => entries.len(),
        }
    }

    /// Check if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in this subtree, counting this node, keys and values.
    pub fn node_count(&self) -> usize {
        let children = match &self.children {
            Children::None => 0,
            Children::Sequence(items) => items.iter().map(Node::node_count).sum(),
            Children::Mapping(entries) => entries
                .iter()
                .map(|entry| entry.key.node_count() + entry.value.node_count())
                .sum(),
        };
        1 + children
    }
}

impl MappingEntry {
    pub fn new(key: Node, value: Node) -> Self {
        Self { key, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(value: &str, line: usize) -> Node {
        Node::scalar(Tag::String, value, line)
    }

    fn entry(key: &str, value: Node) -> MappingEntry {
        MappingEntry::new(string(key, value.line), value)
    }

    #[test]
    fn test_scalar_creation() {
        let node = string("test", 3);
        assert!(node.is_scalar());
        assert!(!node.is_sequence());
        assert!(!node.is_mapping());
        assert_eq!(node.line, 3);
        assert_eq!(node.len(), 0);
        assert!(node.as_sequence().is_none());
    }

    #[test]
    fn test_sequence_creation() {
        let node = Node::sequence(vec![string("a", 2), string("b", 3)], 2);
        assert!(node.is_sequence());
        assert_eq!(node.tag, Tag::Sequence);
        assert_eq!(node.len(), 2);
        assert_eq!(node.as_sequence().unwrap()[1].value, "b");
    }

    #[test]
    fn test_field_lookup() {
        let node = Node::mapping(
            vec![
                entry("apiVersion", string("v1", 1)),
                entry("kind", string("Pod", 2)),
            ],
            1,
        );
        assert_eq!(node.field("kind").unwrap().value, "Pod");
        assert!(node.field("metadata").is_none());
    }

    #[test]
    fn test_field_first_match_wins() {
        let node = Node::mapping(
            vec![entry("name", string("first", 1)), entry("name", string("second", 2))],
            1,
        );
        assert_eq!(node.field("name").unwrap().value, "first");
    }

    #[test]
    fn test_field_on_non_mapping_is_absent() {
        assert!(string("name", 1).field("name").is_none());
        let seq = Node::sequence(vec![string("name", 1)], 1);
        assert!(seq.field("name").is_none());
    }

    #[test]
    fn test_field_ignores_non_scalar_keys() {
        let complex_key = Node::sequence(vec![string("name", 1)], 1);
        let node = Node::mapping(
            vec![MappingEntry::new(complex_key, string("value", 1))],
            1,
        );
        assert!(node.field("name").is_none());
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_node_count() {
        assert_eq!(string("x", 1).node_count(), 1);
        let node = Node::mapping(
            vec![
                entry("kind", string("Pod", 1)),
                entry("items", Node::sequence(vec![string("a", 2), string("b", 3)], 2)),
            ],
            1,
        );
        // root + 2 keys + 1 scalar value + 1 sequence with 2 items
        assert_eq!(node.node_count(), 7);
    }
}
