// Per-run validation state and shared field checks

use crate::checks;
use crate::error::{ExpectedType, InstancePath, Position, Violation, ViolationKind};
use crate::policy::{Flow, Halt, ValidationOptions};
use podlint_yaml::Node;
use tracing::trace;

/// Whether a field must exist in its parent mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Validation context tracks state during one validation pass.
///
/// Every violation goes through [`ValidationContext::report`], which records
/// it and asks the policy whether the traversal may continue. The field
/// helpers return `Ok(None)` when a check failed but the pass goes on, and
/// `Err(Halt)` when the policy stops it.
pub struct ValidationContext {
    options: ValidationOptions,
    /// Current instance path (e.g., ["spec", "containers", 0])
    instance_path: InstancePath,
    violations: Vec<Violation>,
}

impl ValidationContext {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            instance_path: InstancePath::new(),
            violations: Vec::new(),
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Record a violation at the current path.
    pub fn report(&mut self, kind: ViolationKind, position: Position) -> Flow {
        let path = self.instance_path.clone();
        self.record(Violation::new(kind, position, path))
    }

    /// Record a violation for the field `key` below the current path.
    pub fn report_field(&mut self, key: &str, kind: ViolationKind, position: Position) -> Flow {
        let mut path = self.instance_path.clone();
        path.push_key(key);
        self.record(Violation::new(kind, position, path))
    }

    fn record(&mut self, violation: Violation) -> Flow {
        trace!(
            path = %violation.path,
            line = ?violation.position.line(),
            message = %violation.message(),
            "violation"
        );
        self.violations.push(violation);
        self.options.policy.after_violation()
    }

    /// Execute a function with a key segment pushed onto the instance path
    pub fn with_key<F, R>(&mut self, key: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push_key(key);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function with an index segment pushed onto the instance path
    pub fn with_index<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push_index(index);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    // ==================== Field presence ====================

    /// Look up `key` in `parent`.
    ///
    /// A missing required field is reported without a line: it does not
    /// exist, so there is nothing to point at.
    pub fn lookup<'n>(
        &mut self,
        parent: &'n Node,
        key: &str,
        presence: Presence,
    ) -> Result<Option<&'n Node>, Halt> {
        match parent.field(key) {
            Some(node) => Ok(Some(node)),
            None => {
                if presence == Presence::Required {
                    self.report_field(key, ViolationKind::missing(key), Position::Unknown)?;
                }
                Ok(None)
            }
        }
    }

    // ==================== Type checks ====================

    /// Reports `<key> must be string` at the node's line.
    pub fn expect_string<'n>(
        &mut self,
        key: &str,
        node: &'n Node,
    ) -> Result<Option<&'n str>, Halt> {
        if checks::is_string(node) {
            return Ok(Some(node.value.as_str()));
        }
        self.report_type(key, node, ExpectedType::String)?;
        Ok(None)
    }

    /// Reports `<key> must be int` at the node's line.
    pub fn expect_integer(&mut self, key: &str, node: &Node) -> Result<Option<i64>, Halt> {
        if let Some(value) = checks::as_integer(node) {
            return Ok(Some(value));
        }
        self.report_type(key, node, ExpectedType::Int)?;
        Ok(None)
    }

    /// Reports `<key> must be object` at the node's line.
    pub fn expect_mapping(&mut self, key: &str, node: &Node) -> Result<bool, Halt> {
        if node.is_mapping() {
            return Ok(true);
        }
        self.report_type(key, node, ExpectedType::Object)?;
        Ok(false)
    }

    /// Reports `<key> must be array` at the node's line.
    pub fn expect_sequence<'n>(
        &mut self,
        key: &str,
        node: &'n Node,
    ) -> Result<Option<&'n [Node]>, Halt> {
        if let Some(items) = node.as_sequence() {
            return Ok(Some(items));
        }
        self.report_type(key, node, ExpectedType::Array)?;
        Ok(None)
    }

    fn report_type(&mut self, key: &str, node: &Node, expected: ExpectedType) -> Flow {
        self.report_field(
            key,
            ViolationKind::type_mismatch(key, expected),
            Position::Known(node.line),
        )
    }

    // ==================== Value checks ====================

    /// Reports `<key> has unsupported value '<v>'` unless the scalar text is allowed.
    pub fn check_one_of(&mut self, key: &str, node: &Node, allowed: &[&str]) -> Flow {
        if checks::is_one_of(&node.value, allowed) {
            return Ok(());
        }
        self.report_field(
            key,
            ViolationKind::unsupported(key, node.value.as_str()),
            Position::Known(node.line),
        )
    }

    /// Reports `<key> has invalid format '<v>'` unless `is_valid` accepts the text.
    pub fn check_format(&mut self, key: &str, node: &Node, is_valid: fn(&str) -> bool) -> Flow {
        if is_valid(&node.value) {
            return Ok(());
        }
        self.report_field(
            key,
            ViolationKind::invalid_format(key, node.value.as_str()),
            Position::Known(node.line),
        )
    }

    // ==================== Composite field checks ====================

    /// A field that must be a string when present.
    pub fn string_field<'n>(
        &mut self,
        parent: &'n Node,
        key: &str,
        presence: Presence,
    ) -> Result<Option<&'n Node>, Halt> {
        let Some(node) = self.lookup(parent, key, presence)? else {
            return Ok(None);
        };
        Ok(self.expect_string(key, node)?.map(|_| node))
    }

    /// A field that must be a mapping when present.
    pub fn mapping_field<'n>(
        &mut self,
        parent: &'n Node,
        key: &str,
        presence: Presence,
    ) -> Result<Option<&'n Node>, Halt> {
        let Some(node) = self.lookup(parent, key, presence)? else {
            return Ok(None);
        };
        Ok(self.expect_mapping(key, node)?.then_some(node))
    }

    /// A field that must be a sequence when present.
    pub fn sequence_field<'n>(
        &mut self,
        parent: &'n Node,
        key: &str,
        presence: Presence,
    ) -> Result<Option<(&'n Node, &'n [Node])>, Halt> {
        let Some(node) = self.lookup(parent, key, presence)? else {
            return Ok(None);
        };
        Ok(self.expect_sequence(key, node)?.map(|items| (node, items)))
    }

    /// A field holding a port number: present, integer, 1-65535.
    pub fn port_field(&mut self, parent: &Node, key: &str, presence: Presence) -> Flow {
        let Some(node) = self.lookup(parent, key, presence)? else {
            return Ok(());
        };
        let Some(port) = self.expect_integer(key, node)? else {
            return Ok(());
        };
        if checks::is_port(port) {
            return Ok(());
        }
        self.report_field(key, ViolationKind::out_of_range(key), Position::Known(node.line))
    }
}
