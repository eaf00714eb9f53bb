//! # blockdoc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use blockdoc_cli::config::CliConfig;
use blockdoc_cli::describe::{run_describe, DescribeArgs};
use blockdoc_cli::validate::{run_validate, ValidateArgs};

/// Block document toolchain.
///
/// Validates JSON or YAML block trees against a versioned block taxonomy
/// and lists what each taxonomy accepts.
#[derive(Parser, Debug)]
#[command(name = "blockdoc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a block tree or stored document.
    Validate(ValidateArgs),

    /// Print the variants and unions of a taxonomy version.
    Describe(DescribeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Describe(args) => run_describe(&args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdoc_cli::validate::OutputFormat;
    use blockdoc_core::TaxonomyVersion;

    #[test]
    fn cli_parse_validate_defaults() {
        let cli = Cli::try_parse_from(["blockdoc", "validate", "page.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("page.json"));
            assert!(args.taxonomy.is_none());
            assert!(args.root.is_none());
            assert!(args.max_depth.is_none());
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_all_flags() {
        let cli = Cli::try_parse_from([
            "blockdoc",
            "validate",
            "page.yaml",
            "--taxonomy",
            "v3",
            "--root",
            "v3/inline",
            "--max-depth",
            "12",
            "--format",
            "json",
        ])
        .unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.taxonomy, Some(TaxonomyVersion::V3));
            assert_eq!(args.root.as_deref(), Some("v3/inline"));
            assert_eq!(args.max_depth, Some(12));
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_taxonomy() {
        assert!(Cli::try_parse_from(["blockdoc", "validate", "p.json", "--taxonomy", "v9"]).is_err());
    }

    #[test]
    fn cli_parse_validate_requires_file() {
        assert!(Cli::try_parse_from(["blockdoc", "validate"]).is_err());
    }

    #[test]
    fn cli_parse_describe() {
        let cli = Cli::try_parse_from(["blockdoc", "describe", "--taxonomy", "v1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Describe(DescribeArgs { taxonomy: Some(TaxonomyVersion::V1) })
        ));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "blockdoc", "describe", "-vv", "--config", "blockdoc.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("blockdoc.yaml")));
    }
}
