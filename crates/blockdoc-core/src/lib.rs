//! # blockdoc-core — Foundational Types for Block Documents
//!
//! Defines the declarative block taxonomies and the records that travel
//! with block trees. Every other crate in the workspace depends on
//! `blockdoc-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One enum per taxonomy version.** `taxonomy::v1::BlockKind` …
//!    `taxonomy::v4::BlockKind` are independent; a kind's shape comes from a
//!    single exhaustive `match`, so adding a kind without a shape does not
//!    compile.
//!
//! 2. **References by name.** Blocks that contain blocks name the allowed
//!    union (`"inline"`, `"any"`) rather than embedding it, which is what
//!    lets cyclic unions be described at all.
//!
//! 3. **Versions never mix.** `TaxonomyVersion` is carried beside every
//!    stored tree and selects exactly one taxonomy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `blockdoc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod taxonomy;
pub mod version;

pub use document::{Document, DocumentRevision, DocumentUpdateResponse, Migrator, StoredDocument};
pub use error::BlockdocError;
pub use taxonomy::{
    ChildrenSpec, FieldDefinition, FieldType, SchemaDefinition, SchemaRef, Taxonomy,
    UnionDefinition, VariantDefinition, VariantKind, ANY_UNION, INLINE_UNION,
};
pub use version::{TaxonomyVersion, TAXONOMY_VERSION_COUNT};
