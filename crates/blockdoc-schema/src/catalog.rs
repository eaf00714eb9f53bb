//! # Schema Catalog
//!
//! One compiled set per taxonomy version, built once per process on first
//! use and shared read-only thereafter.

use std::sync::OnceLock;

use blockdoc_core::taxonomy::{v1::V1, v2::V2, v3::V3, v4::V4};
use blockdoc_core::{StoredDocument, TaxonomyVersion};
use serde_json::Value;

use crate::compiled::CompiledSchemaSet;
use crate::error::{SchemaError, ValidationError};
use crate::registry::SchemaBuilder;
use crate::validate::ValidationOptions;

/// Build and compile the built-in taxonomy for `version`.
///
/// # Errors
///
/// Any [`SchemaError`] from registration or compilation. The built-in
/// taxonomies compile cleanly, so an error here is a defect in a taxonomy
/// module.
pub fn compile_schemas(version: TaxonomyVersion) -> Result<CompiledSchemaSet, SchemaError> {
    let mut builder = SchemaBuilder::new(version);
    match version {
        TaxonomyVersion::V1 => builder.register_taxonomy::<V1>()?,
        TaxonomyVersion::V2 => builder.register_taxonomy::<V2>()?,
        TaxonomyVersion::V3 => builder.register_taxonomy::<V3>()?,
        TaxonomyVersion::V4 => builder.register_taxonomy::<V4>()?,
    }
    builder.compile()
}

/// Compiled schema sets for every taxonomy version.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    v1: CompiledSchemaSet,
    v2: CompiledSchemaSet,
    v3: CompiledSchemaSet,
    v4: CompiledSchemaSet,
}

static GLOBAL: OnceLock<Result<SchemaCatalog, SchemaError>> = OnceLock::new();

impl SchemaCatalog {
    /// Compile every version.
    pub fn compile_all() -> Result<Self, SchemaError> {
        let catalog = Self {
            v1: compile_schemas(TaxonomyVersion::V1)?,
            v2: compile_schemas(TaxonomyVersion::V2)?,
            v3: compile_schemas(TaxonomyVersion::V3)?,
            v4: compile_schemas(TaxonomyVersion::V4)?,
        };
        tracing::debug!(versions = TaxonomyVersion::all().len(), "schema catalog ready");
        Ok(catalog)
    }

    /// The process-wide catalog, compiled on first call.
    ///
    /// A compile failure is memoized too: every caller sees the same error.
    pub fn global() -> Result<&'static SchemaCatalog, SchemaError> {
        GLOBAL
            .get_or_init(Self::compile_all)
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The compiled set for `version`.
    pub fn get(&self, version: TaxonomyVersion) -> &CompiledSchemaSet {
        match version {
            TaxonomyVersion::V1 => &self.v1,
            TaxonomyVersion::V2 => &self.v2,
            TaxonomyVersion::V3 => &self.v3,
            TaxonomyVersion::V4 => &self.v4,
        }
    }

    /// Validate `value` against `root` in `version`.
    pub fn validate(
        &self,
        version: TaxonomyVersion,
        root: &str,
        value: &Value,
    ) -> Result<(), ValidationError> {
        self.get(version).validate(root, value)
    }

    /// Validate the tree of a stored document against the taxonomy its
    /// envelope names.
    pub fn validate_stored(
        &self,
        document: &StoredDocument,
        root: &str,
        options: &ValidationOptions,
    ) -> Result<(), ValidationError> {
        self.get(document.schema_version)
            .validate_with(root, &document.root, options)
    }
}
