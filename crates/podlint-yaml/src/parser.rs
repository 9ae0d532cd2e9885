//! YAML parser that builds [`Node`] trees.

use std::collections::HashMap;

use tracing::debug;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use crate::{Error, MappingEntry, Node, Result, Tag};

/// Parse YAML from a string, producing a node tree.
///
/// Only the first document of the stream is read; anything after it is
/// ignored.
///
/// # Example
///
/// ```rust
/// use podlint_yaml::parse;
///
/// let doc = parse("kind: Pod").unwrap();
/// assert!(doc.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is syntactically invalid or the stream holds
/// no document.
pub fn parse(content: &str) -> Result<Node> {
    parse_impl(content, None)
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is only used for logging; lines in the tree are unaffected.
///
/// # Errors
///
/// Returns an error if the YAML is syntactically invalid or the stream holds
/// no document.
pub fn parse_file(content: &str, filename: &str) -> Result<Node> {
    parse_impl(content, Some(filename))
}

/// Upper bound on nodes produced by alias expansion in one document.
///
/// Nested anchors can grow exponentially; past this limit the document is
/// rejected as malformed.
const MAX_ALIAS_NODES: usize = 10_000;

fn parse_impl(content: &str, filename: Option<&str>) -> Result<Node> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::default();

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(Error::from)?;

    let root = builder.result()?;
    debug!(
        file = filename.unwrap_or("<string>"),
        kind = ?root.kind,
        line = root.line,
        "parsed YAML document"
    );
    Ok(root)
}

/// Builder that implements MarkedEventReceiver to assemble a [`Node`] tree.
#[derive(Default)]
struct TreeBuilder {
    /// Collections under construction
    stack: Vec<Frame>,

    /// Completed nodes by anchor id, for alias expansion
    anchors: HashMap<usize, Node>,

    /// The completed root node
    root: Option<Node>,

    /// Nodes copied in by aliases so far
    alias_nodes: usize,

    /// First structural problem seen; events cannot return errors directly
    error: Option<String>,
}

/// A collection being constructed during parsing.
enum Frame {
    Sequence {
        start: Marker,
        anchor: usize,
        items: Vec<Node>,
    },
    Mapping {
        start: Marker,
        anchor: usize,
        entries: Vec<MappingEntry>,
        pending_key: Option<Node>,
    },
}

impl TreeBuilder {
    fn result(self) -> Result<Node> {
        if let Some(message) = self.error {
            return Err(Error::Malformed(message));
        }
        if !self.stack.is_empty() {
            return Err(Error::Malformed("unterminated collection".into()));
        }
        self.root.ok_or(Error::EmptyDocument)
    }

    fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    fn push_complete(&mut self, node: Node, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }

        match self.stack.last_mut() {
            None => {
                // Later documents are not read, so the first root wins.
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push(MappingEntry::new(key, node)),
                None => *pending_key = Some(node),
            },
        }
    }
}

fn line_of(marker: &Marker) -> usize {
    // The scanner counts lines from 1 and columns from 0.
    marker.line().max(1)
}

fn column_of(marker: &Marker) -> usize {
    marker.col() + 1
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Scalar(value, style, anchor, tag) => {
                let tag = Tag::for_scalar(&value, style, tag.as_ref());
                let node =
                    Node::scalar(tag, value, line_of(&marker)).with_column(column_of(&marker));
                self.push_complete(node, anchor);
            }

            Event::SequenceStart(anchor, _tag) => {
                self.stack.push(Frame::Sequence {
                    start: marker,
                    anchor,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence {
                    start,
                    anchor,
                    items,
                }) => {
                    let node =
                        Node::sequence(items, line_of(&start)).with_column(column_of(&start));
                    self.push_complete(node, anchor);
                }
                _ => self.fail("sequence end without matching start"),
            },

            Event::MappingStart(anchor, _tag) => {
                self.stack.push(Frame::Mapping {
                    start: marker,
                    anchor,
                    entries: Vec::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping {
                    start,
                    anchor,
                    entries,
                    pending_key,
                }) => {
                    if pending_key.is_some() {
                        self.fail("mapping key without value");
                        return;
                    }
                    let node =
                        Node::mapping(entries, line_of(&start)).with_column(column_of(&start));
                    self.push_complete(node, anchor);
                }
                _ => self.fail("mapping end without matching start"),
            },

            Event::Alias(anchor) => {
                if self.error.is_some() {
                    return;
                }
                let Some(size) = self.anchors.get(&anchor).map(Node::node_count) else {
                    self.fail(format!("alias refers to unknown anchor {}", anchor));
                    return;
                };
                self.alias_nodes += size;
                if self.alias_nodes > MAX_ALIAS_NODES {
                    self.fail("alias expansion limit exceeded");
                    return;
                }
                if let Some(node) = self.anchors.get(&anchor).cloned() {
                    self.push_complete(node, 0);
                }
            }

            // Stream and document boundaries carry no content.
            _ => {}
        }
    }
}
