//! # blockdoc-schema — Schema Registry & Recursive Validator
//!
//! Compiles the declarative taxonomies of `blockdoc-core` into linked,
//! immutable validators and checks untrusted block trees against them.
//!
//! ## Registry (`registry`, `compiled`)
//!
//! [`SchemaBuilder`] builds one taxonomy version in two phases: every name
//! is declared before any reference is linked, which is what lets
//! self-referential unions (`any` → `root` → children `any`) compile into
//! a flat [`CompiledSchemaSet`] arena.
//!
//! ## Validation (`validate`)
//!
//! [`validate`] walks a `serde_json::Value` and reports every violation it
//! can find, each with a path such as `children[2].data.content`.
//!
//! ## Catalog (`catalog`)
//!
//! [`SchemaCatalog::global`] compiles every version once per process.
//!
//! ## Crate Policy
//!
//! - Depends only on `blockdoc-core` internally.
//! - Validation never panics on input; invalid trees are data, not errors
//!   of the caller.

pub mod catalog;
pub mod compiled;
pub mod error;
pub mod input;
pub mod registry;
pub mod validate;
pub mod violation;

pub use catalog::{compile_schemas, SchemaCatalog};
pub use compiled::{
    CompiledChildren, CompiledField, CompiledSchemaSet, CompiledType, CompiledUnion,
    CompiledVariant, Discriminant, DiscriminantRead, SchemaId,
};
pub use error::{SchemaError, ValidationError};
pub use input::{load_document, yaml_to_json_value, InputError};
pub use registry::SchemaBuilder;
pub use validate::{validate, validate_with, ValidationOptions, DEFAULT_MAX_DEPTH};
pub use violation::{Violation, ViolationKind, Violations};
