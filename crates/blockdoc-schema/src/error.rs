//! # Schema Errors
//!
//! Two families, kept apart:
//!
//! - [`SchemaError`]: defects in a taxonomy definition or caller misuse
//!   (wrong version, unknown root). Fatal at startup; never produced by
//!   well-formed-but-invalid input.
//! - [`ValidationError`]: the verdict of validating input. A rejected
//!   tree is an expected, recoverable outcome carried as data.

use blockdoc_core::TaxonomyVersion;
use thiserror::Error;

use crate::violation::Violations;

/// Error while building, compiling or addressing a schema set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A name received a second definition in one build.
    #[error("schema {name:?} registered twice in taxonomy {version}")]
    DuplicateVariant {
        /// Taxonomy being built.
        version: TaxonomyVersion,
        /// The duplicated name.
        name: String,
    },

    /// A name was never declared.
    #[error("unknown schema {name:?} in taxonomy {version}")]
    UnknownVariant {
        /// Taxonomy being addressed.
        version: TaxonomyVersion,
        /// The unknown name.
        name: String,
    },

    /// Names were referenced (or declared) but never defined.
    #[error("unresolved references in taxonomy {version}: {}", names.join(", "))]
    UnresolvedReference {
        /// Taxonomy being compiled.
        version: TaxonomyVersion,
        /// Every unresolved name, sorted.
        names: Vec<String>,
    },

    /// Two variants share a discriminant tag or code.
    #[error("discriminant {discriminant} shared by {first:?} and {second:?} in taxonomy {version}")]
    DuplicateDiscriminant {
        /// Taxonomy being compiled.
        version: TaxonomyVersion,
        /// The colliding tag or code.
        discriminant: String,
        /// First variant registered with it.
        first: String,
        /// Second variant registered with it.
        second: String,
    },

    /// A definition or schema name from one version was used with another.
    #[error("taxonomy version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version of the builder or compiled set.
        expected: TaxonomyVersion,
        /// Version carried by the definition or qualified name.
        found: TaxonomyVersion,
    },
}

/// Outcome of validating a value that was not accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The value did not conform to the root schema.
    #[error("validation failed against '{root}' ({version}):\n{violations}")]
    Rejected {
        /// Taxonomy the value was validated against.
        version: TaxonomyVersion,
        /// Root schema name.
        root: String,
        /// Every violation found, in discovery order.
        violations: Violations,
    },

    /// The validation call itself was malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ValidationError {
    /// The violations of a rejected value; `None` for caller errors.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Rejected { violations, .. } => Some(violations),
            Self::Schema(_) => None,
        }
    }
}
