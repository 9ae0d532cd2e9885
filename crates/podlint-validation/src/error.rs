// Violation types for manifest validation

use serde::Serialize;
use std::fmt;

/// Where a violation was found in the source.
///
/// A field that is missing from its parent has no line of its own, so the
/// position is `Unknown` rather than a made-up number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Known(usize),
    Unknown,
}

impl Position {
    /// The line, if known.
    pub fn line(self) -> Option<usize> {
        match self {
            Position::Known(line) => Some(line),
            Position::Unknown => None,
        }
    }
}

/// The shape a field was expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    String,
    Int,
    Object,
    Array,
    StringOrObject,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExpectedType::String => "string",
            ExpectedType::Int => "int",
            ExpectedType::Object => "object",
            ExpectedType::Array => "array",
            ExpectedType::StringOrObject => "string or object",
        })
    }
}

/// Structured violation kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ViolationKind {
    /// The document root is not a mapping
    RootNotObject,

    /// A required field is absent (or blank, for names)
    MissingField { field: String },

    /// A field has the wrong shape or scalar type
    TypeMismatch { field: String, expected: ExpectedType },

    /// A value outside a fixed set of allowed values
    UnsupportedValue { field: String, value: String },

    /// A string that does not match the required pattern
    InvalidFormat { field: String, value: String },

    /// A number outside its range, or an empty collection that needs items
    OutOfRange { field: String },
}

impl ViolationKind {
    pub fn missing(field: impl Into<String>) -> Self {
        ViolationKind::MissingField {
            field: field.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: ExpectedType) -> Self {
        ViolationKind::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    pub fn unsupported(field: impl Into<String>, value: impl Into<String>) -> Self {
        ViolationKind::UnsupportedValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, value: impl Into<String>) -> Self {
        ViolationKind::InvalidFormat {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>) -> Self {
        ViolationKind::OutOfRange {
            field: field.into(),
        }
    }

    /// Stable machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::RootNotObject => "root-not-object",
            ViolationKind::MissingField { .. } => "missing-field",
            ViolationKind::TypeMismatch { .. } => "type-mismatch",
            ViolationKind::UnsupportedValue { .. } => "unsupported-value",
            ViolationKind::InvalidFormat { .. } => "invalid-format",
            ViolationKind::OutOfRange { .. } => "out-of-range",
        }
    }

    /// The message body. Downstream tooling parses these, so the wording is
    /// fixed.
    pub fn message(&self) -> String {
        match self {
            ViolationKind::RootNotObject => "root must be object".to_string(),
            ViolationKind::MissingField { field } => format!("{} is required", field),
            ViolationKind::TypeMismatch { field, expected } => {
                format!("{} must be {}", field, expected)
            }
            ViolationKind::UnsupportedValue { field, value } => {
                format!("{} has unsupported value '{}'", field, value)
            }
            ViolationKind::InvalidFormat { field, value } => {
                format!("{} has invalid format '{}'", field, value)
            }
            ViolationKind::OutOfRange { field } => format!("{} value out of range", field),
        }
    }
}

/// A single schema non-conformance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub position: Position,
    /// Location in the document tree (e.g. `spec.containers[0].name`)
    pub path: InstancePath,
}

impl Violation {
    pub fn new(kind: ViolationKind, position: Position, path: InstancePath) -> Self {
        Self {
            kind,
            position,
            path,
        }
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Render as one output line for `file`.
    ///
    /// `<file>:<line> <message>` when the line is known, otherwise
    /// `<file>: <message>`.
    pub fn render(&self, file: &str) -> String {
        match self.position {
            Position::Known(line) => format!("{}:{} {}", file, line, self.message()),
            Position::Unknown => format!("{}: {}", file, self.message()),
        }
    }
}

/// Instance path (e.g., ["spec", "containers", 0, "name"])
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{}", key)?,
                PathSegment::Key(key) => write!(f, "{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}
