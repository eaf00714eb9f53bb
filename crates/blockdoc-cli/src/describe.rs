//! # Describe Subcommand
//!
//! Prints the compiled variants and unions of one taxonomy version.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use blockdoc_core::TaxonomyVersion;
use blockdoc_schema::{CompiledField, CompiledSchemaSet, SchemaCatalog};

use crate::config::CliConfig;

/// Arguments for the `blockdoc describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Taxonomy version (v1..v4); defaults to the configured taxonomy.
    #[arg(long, value_name = "VERSION")]
    pub taxonomy: Option<TaxonomyVersion>,
}

/// Execute the describe subcommand, printing to stdout.
pub fn run_describe(args: &DescribeArgs, config: &CliConfig) -> Result<u8> {
    let version = args.taxonomy.unwrap_or(config.default_taxonomy);
    let catalog = SchemaCatalog::global().context("failed to compile block taxonomies")?;
    let stdout = std::io::stdout();
    describe_to(catalog.get(version), &mut stdout.lock())?;
    Ok(0)
}

/// Write a listing of `set` to `out`.
pub fn describe_to(set: &CompiledSchemaSet, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Taxonomy {}", set.version())?;
    writeln!(out)?;
    writeln!(out, "Variants:")?;
    for variant in set.variants() {
        let code = variant
            .code
            .map(|c| format!(", code {c}"))
            .unwrap_or_default();
        let closed = if variant.closed { ", closed" } else { "" };
        writeln!(out, "  {} (type {:?}{code}{closed})", variant.name, variant.tag)?;
        write_fields(set, "", &variant.fields, out)?;
        if let Some(data) = &variant.data {
            write_fields(set, "data.", data, out)?;
        }
        if let Some(children) = variant.children {
            let ids = if children.resolvable { " or identifiers" } else { "" };
            writeln!(
                out,
                "    children: list of {} blocks{ids}",
                set.name(children.target)
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Unions:")?;
    for union in set.unions() {
        let members: Vec<&str> = union.members.iter().map(|m| set.name(*m)).collect();
        writeln!(out, "  {} = {}", union.name, members.join(" | "))?;
    }
    Ok(())
}

fn write_fields(
    set: &CompiledSchemaSet,
    prefix: &str,
    fields: &[CompiledField],
    out: &mut dyn Write,
) -> Result<()> {
    for field in fields {
        let presence = if field.required { "required" } else { "optional" };
        writeln!(
            out,
            "    {prefix}{}: {} ({presence})",
            field.name,
            set.describe_type(&field.ty)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(version: TaxonomyVersion) -> String {
        let set = SchemaCatalog::global().unwrap().get(version);
        let mut out = Vec::new();
        describe_to(set, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_v4_listing() {
        let text = describe(TaxonomyVersion::V4);
        assert!(text.starts_with("Taxonomy v4"));
        assert!(text.contains("  heading (type \"Heading\", code 5)"));
        assert!(text.contains("    data.size: number (required)"));
        assert!(text.contains("    data.rows: list of list of inline block (required)"));
        assert!(text.contains("    children: list of inline blocks or identifiers"));
        assert!(text.contains("  inline = text | link"));
        assert!(text.contains("  ref (type \"Ref\", code 2, closed)"));
    }

    #[test]
    fn test_v1_listing_shows_ids() {
        let text = describe(TaxonomyVersion::V1);
        assert!(text.contains("  document (type \"Document\", code 0)"));
        assert!(text.contains("    id: string (required)"));
        assert!(text.contains("  inline = text\n"));
    }
}
