// Pod manifest validation engine
//
// One validator per schema entity. Fields are visited in declaration order
// and sequences in element order; that order is what fail-fast reports first
// and what accumulate-all lists, so it must not depend on map iteration.

use crate::checks;
use crate::context::{Presence, ValidationContext};
use crate::error::{ExpectedType, Position, ViolationKind};
use crate::policy::{Flow, ValidationOptions};
use crate::report::ValidationReport;
use podlint_yaml::{Node, NodeKind};
use tracing::debug;

const PROBES: [&str; 2] = ["readinessProbe", "livenessProbe"];
const RESOURCE_LISTS: [&str; 2] = ["limits", "requests"];

/// Validates a parsed document against the Pod manifest schema.
///
/// The tree is only read. Under fail-fast the report holds at most one
/// violation; under accumulate-all it holds every violation in traversal
/// order.
pub fn validate(root: &Node, options: &ValidationOptions) -> ValidationReport {
    debug!(policy = %options.policy, "validating manifest");
    let mut context = ValidationContext::new(options.clone());

    if validate_root(root, &mut context).is_err() {
        debug!("validation halted at first violation");
    }

    let violations = context.into_violations();
    debug!(violations = violations.len(), "validation finished");
    ValidationReport::new(options.policy, violations)
}

/// Validates with default options (accumulate-all, empty containers rejected).
pub fn validate_manifest(root: &Node) -> ValidationReport {
    validate(root, &ValidationOptions::default())
}

fn validate_root(root: &Node, ctx: &mut ValidationContext) -> Flow {
    if !root.is_mapping() {
        // Nothing below is meaningful without a mapping.
        return ctx.report(ViolationKind::RootNotObject, Position::Known(root.line));
    }

    if let Some(api_version) = ctx.string_field(root, "apiVersion", Presence::Required)? {
        ctx.check_one_of("apiVersion", api_version, checks::API_VERSIONS)?;
    }

    if let Some(kind) = ctx.string_field(root, "kind", Presence::Required)? {
        ctx.check_one_of("kind", kind, checks::KINDS)?;
    }

    if let Some(metadata) = ctx.mapping_field(root, "metadata", Presence::Required)? {
        ctx.with_key("metadata", |ctx| validate_metadata(metadata, ctx))?;
    }

    if let Some(spec) = ctx.mapping_field(root, "spec", Presence::Required)? {
        ctx.with_key("spec", |ctx| validate_spec(spec, ctx))?;
    }

    Ok(())
}

fn validate_metadata(metadata: &Node, ctx: &mut ValidationContext) -> Flow {
    if let Some(name) = ctx.string_field(metadata, "name", Presence::Required)? {
        // A blank name counts as no name, but the node exists so it has a line.
        if name.value.trim().is_empty() {
            ctx.report_field("name", ViolationKind::missing("name"), Position::Known(name.line))?;
        }
    }

    ctx.string_field(metadata, "namespace", Presence::Optional)?;

    if let Some(labels) = ctx.mapping_field(metadata, "labels", Presence::Optional)? {
        ctx.with_key("labels", |ctx| validate_labels(labels, ctx))?;
    }

    Ok(())
}

fn validate_labels(labels: &Node, ctx: &mut ValidationContext) -> Flow {
    for entry in labels.as_mapping().unwrap_or_default() {
        if !checks::is_string(&entry.key) {
            ctx.report(
                ViolationKind::type_mismatch("labels key", ExpectedType::String),
                Position::Known(entry.key.line),
            )?;
        }
        if !checks::is_string(&entry.value) {
            let kind = ViolationKind::type_mismatch("labels value", ExpectedType::String);
            let position = Position::Known(entry.value.line);
            // A collection key has no text to name the path segment after.
            if entry.key.is_scalar() {
                ctx.report_field(&entry.key.value, kind, position)?;
            } else {
                ctx.report(kind, position)?;
            }
        }
    }
    Ok(())
}

fn validate_spec(spec: &Node, ctx: &mut ValidationContext) -> Flow {
    if let Some(os) = ctx.lookup(spec, "os", Presence::Optional)? {
        validate_os(os, ctx)?;
    }

    let Some((containers, items)) = ctx.sequence_field(spec, "containers", Presence::Required)?
    else {
        return Ok(());
    };

    if items.is_empty() {
        if ctx.options().allow_empty_containers {
            return Ok(());
        }
        return ctx.report_field(
            "containers",
            ViolationKind::out_of_range("containers"),
            Position::Known(containers.line),
        );
    }

    debug!(count = items.len(), "validating containers");
    ctx.with_key("containers", |ctx| {
        for (index, container) in items.iter().enumerate() {
            ctx.with_index(index, |ctx| validate_container(container, ctx))?;
        }
        Ok(())
    })
}

/// `os` is either a bare name or `{name: <os>}`.
fn validate_os(os: &Node, ctx: &mut ValidationContext) -> Flow {
    match os.kind {
        NodeKind::Scalar => ctx.check_one_of("os", os, checks::OPERATING_SYSTEMS),
        NodeKind::Mapping => ctx.with_key("os", |ctx| {
            if let Some(name) = ctx.string_field(os, "name", Presence::Required)? {
                ctx.check_one_of("name", name, checks::OPERATING_SYSTEMS)?;
            }
            Ok(())
        }),
        NodeKind::Sequence => ctx.report_field(
            "os",
            ViolationKind::type_mismatch("os", ExpectedType::StringOrObject),
            Position::Known(os.line),
        ),
    }
}

fn validate_container(container: &Node, ctx: &mut ValidationContext) -> Flow {
    if !container.is_mapping() {
        return ctx.report(
            ViolationKind::type_mismatch("container", ExpectedType::Object),
            Position::Known(container.line),
        );
    }

    if let Some(name) = ctx.string_field(container, "name", Presence::Required)? {
        ctx.check_format("name", name, checks::is_snake_case)?;
    }

    if let Some(image) = ctx.string_field(container, "image", Presence::Required)? {
        ctx.check_format("image", image, checks::is_registry_image)?;
    }

    if let Some((_, ports)) = ctx.sequence_field(container, "ports", Presence::Optional)? {
        ctx.with_key("ports", |ctx| {
            for (index, port) in ports.iter().enumerate() {
                ctx.with_index(index, |ctx| validate_container_port(port, ctx))?;
            }
            Ok(())
        })?;
    }

    // Only httpGet probes are understood; exec and tcpSocket are left alone.
    for probe_key in PROBES {
        if let Some(probe) = ctx.mapping_field(container, probe_key, Presence::Optional)? {
            ctx.with_key(probe_key, |ctx| validate_probe(probe, ctx))?;
        }
    }

    if let Some(resources) = ctx.mapping_field(container, "resources", Presence::Required)? {
        ctx.with_key("resources", |ctx| validate_resources(resources, ctx))?;
    }

    Ok(())
}

fn validate_container_port(port: &Node, ctx: &mut ValidationContext) -> Flow {
    if !port.is_mapping() {
        return ctx.report(
            ViolationKind::type_mismatch("ports item", ExpectedType::Object),
            Position::Known(port.line),
        );
    }

    ctx.port_field(port, "containerPort", Presence::Required)?;

    if let Some(protocol) = ctx.string_field(port, "protocol", Presence::Optional)? {
        ctx.check_one_of("protocol", protocol, checks::PROTOCOLS)?;
    }

    Ok(())
}

fn validate_probe(probe: &Node, ctx: &mut ValidationContext) -> Flow {
    let Some(http_get) = ctx.mapping_field(probe, "httpGet", Presence::Required)? else {
        return Ok(());
    };

    ctx.with_key("httpGet", |ctx| {
        if let Some(path) = ctx.string_field(http_get, "path", Presence::Required)? {
            ctx.check_format("path", path, checks::is_http_path)?;
        }
        ctx.port_field(http_get, "port", Presence::Required)
    })
}

fn validate_resources(resources: &Node, ctx: &mut ValidationContext) -> Flow {
    for list_key in RESOURCE_LISTS {
        if let Some(quantities) = ctx.mapping_field(resources, list_key, Presence::Optional)? {
            ctx.with_key(list_key, |ctx| validate_quantities(quantities, ctx))?;
        }
    }
    Ok(())
}

/// Only `cpu` and `memory` are checked; other resource names pass through.
fn validate_quantities(quantities: &Node, ctx: &mut ValidationContext) -> Flow {
    if let Some(cpu) = ctx.lookup(quantities, "cpu", Presence::Optional)? {
        ctx.expect_integer("cpu", cpu)?;
    }

    if let Some(memory) = ctx.string_field(quantities, "memory", Presence::Optional)? {
        ctx.check_format("memory", memory, checks::is_memory_quantity)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ValidationPolicy;
    use podlint_yaml::{MappingEntry, Tag};

    // Trees are built by hand here; parsed documents are covered by the
    // integration tests.

    fn string(value: &str, line: usize) -> Node {
        Node::scalar(Tag::String, value, line)
    }

    fn int(value: &str, line: usize) -> Node {
        Node::scalar(Tag::Integer, value, line)
    }

    fn object(line: usize, entries: Vec<(&str, Node)>) -> Node {
        Node::mapping(
            entries
                .into_iter()
                .map(|(k, v)| MappingEntry::new(string(k, v.line), v))
                .collect(),
            line,
        )
    }

    fn valid_container(line: usize) -> Node {
        object(
            line,
            vec![
                ("name", string("web", line)),
                ("image", string("registry.bigbrother.io/app:1.0", line + 1)),
                ("resources", object(line + 2, vec![])),
            ],
        )
    }

    fn manifest(spec: Node) -> Node {
        object(
            1,
            vec![
                ("apiVersion", string("v1", 1)),
                ("kind", string("Pod", 2)),
                ("metadata", object(4, vec![("name", string("pod", 4))])),
                ("spec", spec),
            ],
        )
    }

    fn messages(report: &ValidationReport) -> Vec<String> {
        report.violations().iter().map(|v| v.message()).collect()
    }

    #[test]
    fn test_valid_tree() {
        let root = manifest(object(
            6,
            vec![("containers", Node::sequence(vec![valid_container(7)], 7))],
        ));
        let report = validate_manifest(&root);
        assert!(report.is_valid(), "{:?}", report.violations());
    }

    #[test]
    fn test_root_must_be_object() {
        let report = validate_manifest(&Node::sequence(vec![], 3));
        assert_eq!(messages(&report), vec!["root must be object"]);
        assert_eq!(report.violations()[0].position, Position::Known(3));
    }

    #[test]
    fn test_empty_root_mapping_reports_each_required_field() {
        let report = validate_manifest(&object(1, vec![]));
        assert_eq!(
            messages(&report),
            vec![
                "apiVersion is required",
                "kind is required",
                "metadata is required",
                "spec is required",
            ]
        );
        assert!(
            report
                .violations()
                .iter()
                .all(|v| v.position == Position::Unknown)
        );
    }

    #[test]
    fn test_fail_fast_reports_first_in_order() {
        let options = ValidationOptions::default().with_policy(ValidationPolicy::FailFast);
        let report = validate(&object(1, vec![]), &options);
        assert_eq!(messages(&report), vec!["apiVersion is required"]);
    }

    #[test]
    fn test_malformed_container_does_not_stop_siblings() {
        let root = manifest(object(
            6,
            vec![(
                "containers",
                Node::sequence(vec![string("oops", 7), valid_container(8), int("3", 11)], 7),
            )],
        ));
        let report = validate_manifest(&root);
        assert_eq!(
            messages(&report),
            vec!["container must be object", "container must be object"]
        );
        assert_eq!(report.violations()[1].position, Position::Known(11));
        assert_eq!(
            report.violations()[1].path.to_string(),
            "spec.containers[2]"
        );
    }

    #[test]
    fn test_blank_name_is_missing_at_its_line() {
        let root = object(
            1,
            vec![
                ("apiVersion", string("v1", 1)),
                ("kind", string("Pod", 2)),
                ("metadata", object(4, vec![("name", string("   ", 4))])),
                (
                    "spec",
                    object(
                        6,
                        vec![("containers", Node::sequence(vec![valid_container(7)], 7))],
                    ),
                ),
            ],
        );
        let report = validate_manifest(&root);
        assert_eq!(messages(&report), vec!["name is required"]);
        assert_eq!(report.violations()[0].position, Position::Known(4));
    }

    #[test]
    fn test_empty_containers_configurable() {
        let root = manifest(object(6, vec![("containers", Node::sequence(vec![], 6))]));

        let strict = validate_manifest(&root);
        assert_eq!(messages(&strict), vec!["containers value out of range"]);

        let lenient = validate(
            &root,
            &ValidationOptions::default().allow_empty_containers(true),
        );
        assert!(lenient.is_valid());
    }

    #[test]
    fn test_os_shapes() {
        let with_os = |os: Node| {
            manifest(object(
                6,
                vec![
                    ("os", os),
                    ("containers", Node::sequence(vec![valid_container(8)], 8)),
                ],
            ))
        };

        assert!(validate_manifest(&with_os(string("linux", 6))).is_valid());
        assert!(
            validate_manifest(&with_os(object(6, vec![("name", string("windows", 6))]))).is_valid()
        );
        assert_eq!(
            messages(&validate_manifest(&with_os(string("plan9", 6)))),
            vec!["os has unsupported value 'plan9'"]
        );
        assert_eq!(
            messages(&validate_manifest(&with_os(object(6, vec![])))),
            vec!["name is required"]
        );
        assert_eq!(
            messages(&validate_manifest(&with_os(Node::sequence(vec![], 6)))),
            vec!["os must be string or object"]
        );
    }

    #[test]
    fn test_label_path_skips_collection_keys() {
        let labels = Node::mapping(
            vec![
                MappingEntry::new(string("app", 5), int("1", 5)),
                MappingEntry::new(Node::sequence(vec![string("a", 6)], 6), int("2", 7)),
            ],
            5,
        );
        let root = object(
            1,
            vec![
                ("apiVersion", string("v1", 1)),
                ("kind", string("Pod", 2)),
                (
                    "metadata",
                    object(3, vec![("name", string("pod", 3)), ("labels", labels)]),
                ),
                (
                    "spec",
                    object(
                        8,
                        vec![("containers", Node::sequence(vec![valid_container(9)], 9))],
                    ),
                ),
            ],
        );

        let report = validate_manifest(&root);
        let found: Vec<(String, String)> = report
            .violations()
            .iter()
            .map(|v| (v.message(), v.path.to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("labels value must be string".to_string(), "metadata.labels.app".to_string()),
                ("labels key must be string".to_string(), "metadata.labels".to_string()),
                ("labels value must be string".to_string(), "metadata.labels".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_probe_mechanisms_are_ignored() {
        let container = object(
            7,
            vec![
                ("name", string("web", 7)),
                ("image", string("registry.bigbrother.io/app:1.0", 8)),
                (
                    "livenessProbe",
                    object(
                        9,
                        vec![
                            ("exec", object(10, vec![("command", Node::sequence(vec![], 10))])),
                            (
                                "httpGet",
                                object(
                                    11,
                                    vec![("path", string("/live", 11)), ("port", int("8080", 12))],
                                ),
                            ),
                        ],
                    ),
                ),
                ("resources", object(13, vec![])),
            ],
        );
        let root = manifest(object(6, vec![("containers", Node::sequence(vec![container], 7))]));
        assert!(validate_manifest(&root).is_valid());
    }

    #[test]
    fn test_unknown_resource_names_are_ignored() {
        let container = object(
            7,
            vec![
                ("name", string("web", 7)),
                ("image", string("registry.bigbrother.io/app:1.0", 8)),
                (
                    "resources",
                    object(
                        9,
                        vec![(
                            "limits",
                            object(
                                10,
                                vec![
                                    ("cpu", int("2", 10)),
                                    ("nvidia.com/gpu", int("1", 11)),
                                    ("ephemeral-storage", string("whatever", 12)),
                                ],
                            ),
                        )],
                    ),
                ),
            ],
        );
        let root = manifest(object(6, vec![("containers", Node::sequence(vec![container], 7))]));
        assert!(validate_manifest(&root).is_valid());
    }
}
