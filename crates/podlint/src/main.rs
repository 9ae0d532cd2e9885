//! podlint - Pod manifest linter

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use podlint_validation::{ValidationOptions, ValidationPolicy, Verdict, validate};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when the document could not be read or parsed.
const EXIT_FAILURE: u8 = 2;

/// Validate a Pod manifest against the schema
#[derive(Parser, Debug)]
#[command(name = "podlint")]
#[command(version, about = "Validate Pod manifests", long_about = None)]
struct Args {
    /// Path to the YAML manifest to validate
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Stop at the first violation instead of reporting all of them
    #[arg(long, env = "PODLINT_FAIL_FAST")]
    fail_fast: bool,

    /// Accept a pod whose containers list is empty
    #[arg(long)]
    allow_empty_containers: bool,

    /// Output format for violations
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Args {
    fn options(&self) -> ValidationOptions {
        let policy = if self.fail_fast {
            ValidationPolicy::FailFast
        } else {
            ValidationPolicy::AccumulateAll
        };
        ValidationOptions::new()
            .with_policy(policy)
            .allow_empty_containers(self.allow_empty_containers)
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the violations.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podlint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // clap exits with status 2 on usage errors.
    let args = Args::parse();
    let file = display_name(&args.file);

    match run(&args, &file) {
        Ok(Verdict::Valid) => ExitCode::SUCCESS,
        Ok(Verdict::Invalid) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}: {:#}", file, e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: &Args, file: &str) -> Result<Verdict> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    debug!(path = %args.file.display(), bytes = content.len(), "read manifest");

    let doc = podlint_yaml::parse_file(&content, file)?;

    let options = args.options();
    let report = validate(&doc, &options);

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text(file)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report.to_json(file))
                .context("failed to serialize report")?
        ),
    }

    Ok(report.verdict())
}

/// The name violations are reported against: the file's base name.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_base_name() {
        assert_eq!(display_name(Path::new("/srv/manifests/pod.yaml")), "pod.yaml");
        assert_eq!(display_name(Path::new("pod.yaml")), "pod.yaml");
    }

    #[test]
    fn test_flags_map_to_options() {
        let args = Args::parse_from([
            "podlint",
            "--fail-fast",
            "--allow-empty-containers",
            "p.yaml",
        ]);
        let options = args.options();
        assert_eq!(options.policy, ValidationPolicy::FailFast);
        assert!(options.allow_empty_containers);
        assert_eq!(args.format, OutputFormat::Text);

        let args = Args::parse_from(["podlint", "--format", "json", "p.yaml"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.options(), ValidationOptions::default());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
