//! Type and format checks.
//!
//! Stateless predicates over single nodes or scalar text. They never report
//! anything themselves; the validators decide what a failed check means.

use once_cell::sync::Lazy;
use podlint_yaml::{Node, Tag};
use regex::Regex;

pub const API_VERSIONS: &[&str] = &["v1"];
pub const KINDS: &[&str] = &["Pod"];
pub const OPERATING_SYSTEMS: &[&str] = &["linux", "windows"];
pub const PROTOCOLS: &[&str] = &["TCP", "UDP"];

static SNAKE_CASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(_[a-z0-9]+)*$").expect("snake_case pattern is valid"));

// Repository and tag may not contain ':' or whitespace, and the tag may not
// contain '/', so the ':' always follows the final '/'.
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^registry\.bigbrother\.io/[^:\s]+:[^:/\s]+$").expect("image pattern is valid")
});

static MEMORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(Gi|Mi|Ki)$").expect("memory pattern is valid"));

/// A scalar tagged as a string.
pub fn is_string(node: &Node) -> bool {
    node.is_scalar() && node.tag == Tag::String
}

/// A scalar tagged as an integer whose text parses as base 10.
pub fn is_integer(node: &Node) -> bool {
    as_integer(node).is_some()
}

/// The value of an integer scalar.
///
/// Both the tag and the text must agree: an integer-tagged node whose text
/// is not a base-10 number (`0x1F`, or `!!int abc`) yields `None`.
pub fn as_integer(node: &Node) -> Option<i64> {
    if !node.is_scalar() || node.tag != Tag::Integer {
        return None;
    }
    node.value.parse::<i64>().ok()
}

/// `^[a-z0-9]+(_[a-z0-9]+)*$`
pub fn is_snake_case(value: &str) -> bool {
    SNAKE_CASE_RE.is_match(value)
}

/// An image reference on the internal registry with a non-empty tag.
pub fn is_registry_image(value: &str) -> bool {
    IMAGE_RE.is_match(value)
}

/// A memory quantity such as `512Mi`: digits and one binary unit suffix.
pub fn is_memory_quantity(value: &str) -> bool {
    MEMORY_RE.is_match(value)
}

/// An HTTP path must be absolute.
pub fn is_http_path(value: &str) -> bool {
    value.starts_with('/')
}

/// Valid TCP/UDP port number (1-65535).
pub fn is_port(value: i64) -> bool {
    value > 0 && value < 65536
}

pub fn is_one_of(value: &str, allowed: &[&str]) -> bool {
    allowed.contains(&value)
}
