//! # podlint-validation
//!
//! Schema validation of Pod manifests.
//!
//! Validation walks a [`podlint_yaml::Node`] tree in a fixed order and
//! produces a [`ValidationReport`] of [`Violation`]s. Each violation carries
//! a fixed message, the source line of the offending node when it exists,
//! and the instance path that leads to it.
//!
//! Two policies are available. Accumulate-all records every violation;
//! fail-fast stops at the first. For any document the fail-fast result is
//! the first element of the accumulate-all result.
//!
//! ## Example
//!
//! ```rust
//! use podlint_validation::{ValidationOptions, validate};
//!
//! let doc = podlint_yaml::parse("apiVersion: v2\nkind: Pod\n").unwrap();
//! let report = validate(&doc, &ValidationOptions::default().fail_fast());
//! assert_eq!(
//!     report.render_text("pod.yaml"),
//!     "pod.yaml:1 apiVersion has unsupported value 'v2'\n"
//! );
//! ```

pub mod checks;
pub mod context;
pub mod error;
pub mod policy;
mod report;
mod validator;

pub use error::{ExpectedType, InstancePath, PathSegment, Position, Violation, ViolationKind};
pub use policy::{Flow, Halt, ValidationOptions, ValidationPolicy};
pub use report::{ValidationReport, Verdict};
pub use validator::{validate, validate_manifest};
