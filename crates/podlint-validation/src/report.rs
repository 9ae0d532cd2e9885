// Outcome of one validation pass

use crate::error::Violation;
use crate::policy::ValidationPolicy;
use serde_json::{Value, json};

/// Overall outcome of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

/// The violations found in one document, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    policy: ValidationPolicy,
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(policy: ValidationPolicy, violations: Vec<Violation>) -> Self {
        Self { policy, violations }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_valid() {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }

    /// One line per violation, each terminated by a newline. Empty when the
    /// document is valid.
    pub fn render_text(&self, file: &str) -> String {
        let mut out = String::new();
        for violation in &self.violations {
            out.push_str(&violation.render(file));
            out.push('\n');
        }
        out
    }

    /// JSON form of the report. `line` is null for violations without a
    /// source position. `kind` and `segments` are the structured forms of
    /// `message` and `path`.
    pub fn to_json(&self, file: &str) -> Value {
        let violations: Vec<Value> = self
            .violations
            .iter()
            .map(|violation| {
                json!({
                    "code": violation.code(),
                    "message": violation.message(),
                    "line": violation.position.line(),
                    "path": violation.path.to_string(),
                    "kind": &violation.kind,
                    "segments": &violation.path,
                })
            })
            .collect();

        json!({
            "file": file,
            "valid": self.is_valid(),
            "policy": self.policy.to_string(),
            "violations": violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InstancePath, Position, ViolationKind};

    fn sample() -> ValidationReport {
        let mut path = InstancePath::new();
        path.push_key("kind");
        ValidationReport::new(
            ValidationPolicy::AccumulateAll,
            vec![
                Violation::new(
                    ViolationKind::unsupported("apiVersion", "v2"),
                    Position::Known(1),
                    InstancePath::new(),
                ),
                Violation::new(ViolationKind::missing("kind"), Position::Unknown, path),
            ],
        )
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new(ValidationPolicy::FailFast, vec![]);
        assert!(report.is_valid());
        assert_eq!(report.verdict(), Verdict::Valid);
        assert_eq!(report.render_text("pod.yaml"), "");
    }

    #[test]
    fn test_render_text() {
        let report = sample();
        assert_eq!(report.verdict(), Verdict::Invalid);
        assert_eq!(
            report.render_text("pod.yaml"),
            "pod.yaml:1 apiVersion has unsupported value 'v2'\npod.yaml: kind is required\n"
        );
    }

    #[test]
    fn test_to_json() {
        let value = sample().to_json("pod.yaml");
        assert_eq!(value["file"], "pod.yaml");
        assert_eq!(value["valid"], false);
        assert_eq!(value["policy"], "accumulate-all");
        assert_eq!(value["violations"][0]["code"], "unsupported-value");
        assert_eq!(value["violations"][0]["line"], 1);
        assert_eq!(value["violations"][0]["path"], "(root)");
        assert!(value["violations"][1]["line"].is_null());
        assert_eq!(value["violations"][1]["path"], "kind");
        assert_eq!(value["violations"][1]["message"], "kind is required");

        assert_eq!(value["violations"][0]["kind"]["type"], "UnsupportedValue");
        assert_eq!(value["violations"][0]["kind"]["data"]["value"], "v2");
        assert_eq!(value["violations"][0]["segments"], json!([]));
        assert_eq!(value["violations"][1]["kind"]["type"], "MissingField");
        assert_eq!(value["violations"][1]["kind"]["data"]["field"], "kind");
        assert_eq!(
            value["violations"][1]["segments"],
            json!([{"type": "Key", "value": "kind"}])
        );
    }
}
