//! # Validate Subcommand
//!
//! Checks one JSON or YAML file against a taxonomy version.
//!
//! The file holds either a bare block tree or a stored-document envelope
//! (`{"schemaVersion": "v3", "root": {...}}`). An envelope selects its own
//! taxonomy; `--taxonomy` must then agree with it.
//!
//! Exit codes: 0 accepted, 2 rejected, 1 operational error.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use blockdoc_core::{StoredDocument, TaxonomyVersion};
use blockdoc_schema::{
    load_document, SchemaCatalog, SchemaError, ValidationError, ValidationOptions, Violation,
};

use crate::config::CliConfig;

/// Exit code for a rejected tree.
pub const EXIT_REJECTED: u8 = 2;

/// Output style of the validation report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One summary line, then one line per violation.
    Text,
    /// A single JSON object.
    Json,
}

/// Arguments for the `blockdoc validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON or YAML file holding a block tree or stored document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Taxonomy version (v1..v4) for bare block trees.
    #[arg(long, value_name = "VERSION")]
    pub taxonomy: Option<TaxonomyVersion>,

    /// Root schema name, optionally qualified (`v3/any`).
    #[arg(long, value_name = "NAME")]
    pub root: Option<String>,

    /// Deepest block nesting accepted.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    file: String,
    version: TaxonomyVersion,
    root: &'a str,
    valid: bool,
    violations: &'a [Violation],
}

/// Execute the validate subcommand, printing to stdout.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    validate_to(args, config, &mut out)
}

/// Execute the validate subcommand, writing the report to `out`.
pub fn validate_to(args: &ValidateArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let value = load_document(&args.file)?;
    let (version, tree) = select_tree(value, args.taxonomy, config.default_taxonomy)?;
    let root = args.root.as_deref().unwrap_or(&config.root);
    let options = ValidationOptions {
        max_depth: args.max_depth.unwrap_or(config.max_depth),
    };

    tracing::info!(
        file = %args.file.display(),
        %version,
        root,
        max_depth = options.max_depth,
        "validating block tree"
    );

    let catalog = SchemaCatalog::global().context("failed to compile block taxonomies")?;
    let outcome = catalog.get(version).validate_with(root, &tree, &options);

    let (violations, code) = match &outcome {
        Ok(()) => (&[][..], 0),
        Err(ValidationError::Rejected { violations, .. }) => {
            (violations.violations(), EXIT_REJECTED)
        }
        Err(ValidationError::Schema(e)) => {
            return Err(e.clone()).with_context(|| format!("cannot validate against '{root}'"));
        }
    };

    let report = Report {
        file: args.file.display().to_string(),
        version,
        root,
        valid: code == 0,
        violations,
    };
    write_report(&report, args.format, out)?;
    Ok(code)
}

/// Unwrap a stored-document envelope, or pair a bare tree with the
/// requested (or default) version.
fn select_tree(
    value: Value,
    requested: Option<TaxonomyVersion>,
    default: TaxonomyVersion,
) -> Result<(TaxonomyVersion, Value)> {
    if !StoredDocument::is_envelope(&value) {
        return Ok((requested.unwrap_or(default), value));
    }
    let stored = StoredDocument::from_value(value)?;
    if let Some(expected) = requested {
        if expected != stored.schema_version {
            return Err(SchemaError::VersionMismatch {
                expected,
                found: stored.schema_version,
            }
            .into());
        }
    }
    Ok((stored.schema_version, stored.root))
}

fn write_report(report: &Report<'_>, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Text if report.valid => {
            writeln!(
                out,
                "OK: {} ({}, root '{}')",
                report.file, report.version, report.root
            )?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "FAIL: {} ({}, root '{}'): {} violation(s)",
                report.file,
                report.version,
                report.root,
                report.violations.len()
            )?;
            for violation in report.violations {
                writeln!(out, "{violation}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(file: PathBuf) -> ValidateArgs {
        ValidateArgs {
            file,
            taxonomy: None,
            root: None,
            max_depth: None,
            format: OutputFormat::Text,
        }
    }

    fn write(dir: &tempfile::TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn run(args: &ValidateArgs) -> (u8, String) {
        let mut out = Vec::new();
        let code = validate_to(args, &CliConfig::default(), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_accepted_tree_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(
            &dir,
            "heading.json",
            &json!({"type": "Heading", "data": {"content": "Hi", "size": 1}}),
        );
        let (code, out) = run(&args(file));
        assert_eq!(code, 0);
        assert!(out.starts_with("OK:"));
        assert!(out.contains("v4"));
    }

    #[test]
    fn test_rejected_tree_lists_violations() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(
            &dir,
            "heading.json",
            &json!({"type": "Heading", "data": {"content": "Hi"}}),
        );
        let (code, out) = run(&args(file));
        assert_eq!(code, EXIT_REJECTED);
        assert!(out.contains("1 violation(s)"));
        assert!(out.contains("data.size: missing_required_field"));
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(
            &dir,
            "list.json",
            &json!({
                "type": "List",
                "data": {"ordered": true},
                "children": [{"type": "Heading", "data": {"content": "Hi", "size": 1}}]
            }),
        );
        let mut a = args(file);
        a.format = OutputFormat::Json;
        let (code, out) = run(&a);
        assert_eq!(code, EXIT_REJECTED);
        let report: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["valid"], json!(false));
        assert_eq!(report["version"], json!("v4"));
        assert_eq!(
            report["violations"],
            json!([{"path": "children[0]", "expected": "inline", "kind": "child_union_mismatch"}])
        );
    }

    #[test]
    fn test_envelope_selects_version() {
        let dir = tempfile::tempdir().unwrap();
        // Valid only in v1, where ids are mandatory.
        let file = write(
            &dir,
            "stored.json",
            &json!({
                "schemaVersion": "v1",
                "root": {"type": "Heading", "id": "h", "data": {"content": "Hi", "size": 1}}
            }),
        );
        let (code, out) = run(&args(file.clone()));
        assert_eq!(code, 0, "{out}");
        assert!(out.contains("v1"));

        let mut conflicting = args(file);
        conflicting.taxonomy = Some(TaxonomyVersion::V2);
        let err = validate_to(&conflicting, &CliConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = json!({"type": "Text", "data": {
            "bold": false, "italic": false, "underline": false, "strikethrough": false,
            "content": "leaf"
        }});
        for _ in 0..3 {
            tree = json!({"type": "Group", "children": [tree]});
        }
        let file = write(&dir, "deep.json", &tree);

        let config = CliConfig {
            max_depth: 1,
            ..CliConfig::default()
        };
        let mut out = Vec::new();
        assert_eq!(validate_to(&args(file.clone()), &config, &mut out).unwrap(), EXIT_REJECTED);

        let mut deeper = args(file);
        deeper.max_depth = Some(8);
        assert_eq!(validate_to(&deeper, &config, &mut Vec::new()).unwrap(), 0);
    }

    #[test]
    fn test_yaml_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.yaml");
        std::fs::write(&path, "type: Image\ndata:\n  src: cat.png\n  width: 4\n  height: 3\n").unwrap();
        let mut a = args(path);
        a.taxonomy = Some(TaxonomyVersion::V2);
        assert_eq!(run(&a).0, 0);
    }

    #[test]
    fn test_unknown_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(&dir, "t.json", &json!({"type": "Text"}));
        let mut a = args(file);
        a.root = Some("paragraphs".to_string());
        assert!(validate_to(&a, &CliConfig::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(dir.path().join("absent.json"));
        assert!(validate_to(&a, &CliConfig::default(), &mut Vec::new()).is_err());
    }
}
