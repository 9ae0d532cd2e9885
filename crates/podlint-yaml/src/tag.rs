//! Semantic type tags for YAML nodes.
//!
//! Plain scalars are resolved with the YAML 1.2 core schema. Quoted and block
//! scalars are always strings. Explicit core tags (`!!int`, `!!str`, ...)
//! override resolution without looking at the text, which is how a node can
//! carry the integer tag and still fail to parse as one.

use std::fmt;
use yaml_rust2::parser::Tag as YamlTag;
use yaml_rust2::scanner::TScalarStyle;

/// Tag handles that name the YAML core schema (`!!` before and after
/// directive resolution).
const CORE_HANDLES: &[&str] = &["!!", "tag:yaml.org,2002:"];

/// The semantic type of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Sequence,
    Mapping,
    /// A non-core tag such as `!path`; holds the suffix.
    Custom(String),
}

impl Tag {
    /// Stable text label for this tag.
    pub fn as_str(&self) -> &str {
        match self {
            Tag::String => "string",
            Tag::Integer => "integer",
            Tag::Float => "float",
            Tag::Boolean => "boolean",
            Tag::Null => "null",
            Tag::Sequence => "sequence",
            Tag::Mapping => "mapping",
            Tag::Custom(name) => name,
        }
    }

    /// Resolve the tag of a scalar from its style, explicit tag and text.
    pub(crate) fn for_scalar(value: &str, style: TScalarStyle, explicit: Option<&YamlTag>) -> Tag {
        if let Some(tag) = explicit {
            return Tag::from_explicit(tag);
        }
        if !matches!(style, TScalarStyle::Plain) {
            return Tag::String;
        }
        resolve_plain(value)
    }

    fn from_explicit(tag: &YamlTag) -> Tag {
        if tag.handle == "!" && tag.suffix.is_empty() {
            // The non-specific tag forces a string.
            return Tag::String;
        }
        if !CORE_HANDLES.contains(&tag.handle.as_str()) {
            return Tag::Custom(tag.suffix.clone());
        }
        match tag.suffix.as_str() {
            "str" => Tag::String,
            "int" => Tag::Integer,
            "float" => Tag::Float,
            "bool" => Tag::Boolean,
            "null" => Tag::Null,
            "seq" => Tag::Sequence,
            "map" => Tag::Mapping,
            other => Tag::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn resolve_plain(value: &str) -> Tag {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => return Tag::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => return Tag::Boolean,
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" | "-.inf" | "-.Inf" | "-.INF"
        | ".nan" | ".NaN" | ".NAN" => return Tag::Float,
        _ => {}
    }
    if is_core_int(value) {
        Tag::Integer
    } else if is_core_float(value) {
        Tag::Float
    } else {
        Tag::String
    }
}

fn is_core_int(value: &str) -> bool {
    if let Some(octal) = value.strip_prefix("0o") {
        return !octal.is_empty() && octal.bytes().all(|b| (b'0'..=b'7').contains(&b));
    }
    if let Some(hex) = value.strip_prefix("0x") {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_core_float(value: &str) -> bool {
    let body = value.strip_prefix(['-', '+']).unwrap_or(value);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            let int_ok = int.bytes().all(|b| b.is_ascii_digit());
            let frac_ok = frac.bytes().all(|b| b.is_ascii_digit());
            int_ok && frac_ok && !(int.is_empty() && frac.is_empty())
        }
        None => !mantissa.is_empty() && mantissa.bytes().all(|b| b.is_ascii_digit()),
    };

    let exponent_ok = match exponent {
        Some(exp) => {
            let digits = exp.strip_prefix(['-', '+']).unwrap_or(exp);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => true,
    };

    mantissa_ok && exponent_ok
}
