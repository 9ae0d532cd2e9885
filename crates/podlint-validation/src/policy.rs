//! Violation-collection policy and validation options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the traversal reacts to a reported violation.
///
/// Both policies walk the document in the same order; they only differ in
/// whether the walk continues after the first violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Record every violation and keep descending wherever the tree shape
    /// allows it.
    #[default]
    AccumulateAll,
    /// Stop the whole pass at the first violation.
    FailFast,
}

impl ValidationPolicy {
    /// Decide what happens after a violation has been recorded.
    pub fn after_violation(self) -> Flow {
        match self {
            ValidationPolicy::AccumulateAll => Ok(()),
            ValidationPolicy::FailFast => Err(Halt),
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationPolicy::AccumulateAll => "accumulate-all",
            ValidationPolicy::FailFast => "fail-fast",
        })
    }
}

/// Signal that the traversal must stop now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt;

/// Result of every validation step; `Err(Halt)` unwinds the traversal.
pub type Flow = Result<(), Halt>;

/// Options for a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationOptions {
    pub policy: ValidationPolicy,

    /// Accept `containers: []` instead of reporting it as out of range.
    pub allow_empty_containers: bool,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn fail_fast(self) -> Self {
        self.with_policy(ValidationPolicy::FailFast)
    }

    pub fn allow_empty_containers(mut self, allow: bool) -> Self {
        self.allow_empty_containers = allow;
        self
    }
}
