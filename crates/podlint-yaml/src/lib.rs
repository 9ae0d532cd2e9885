//! # podlint-yaml
//!
//! YAML parsing into a generic node tree with source lines.
//!
//! This crate provides [`Node`], a read-only tree with four shapes (scalar,
//! sequence, mapping, and absence expressed as `Option::None`), a semantic
//! [`Tag`] on every node and the 1-based source line of its first token.
//! Validators consume the tree through [`Node::field`] and never see the
//! underlying YAML library.
//!
//! ## Example
//!
//! ```rust
//! use podlint_yaml::{parse, Tag};
//!
//! let doc = parse("apiVersion: v1\nkind: Pod\n").unwrap();
//! let kind = doc.field("kind").unwrap();
//! assert_eq!(kind.tag, Tag::String);
//! assert_eq!(kind.value, "Pod");
//! assert_eq!(kind.line, 2);
//! ```

mod error;
mod node;
mod parser;
mod tag;

pub use error::{Error, Result};
pub use node::{MappingEntry, Node, NodeKind};
pub use parser::{parse, parse_file};
pub use tag::Tag;
