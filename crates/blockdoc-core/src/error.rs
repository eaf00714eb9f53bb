//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! Schema build errors and validation verdicts live in `blockdoc-schema`;
//! this module only covers parsing of version tags and decoding of the
//! document records that travel alongside block trees.

use thiserror::Error;

/// Top-level error type for the foundational crate.
#[derive(Error, Debug)]
pub enum BlockdocError {
    /// A taxonomy version tag that no compiled schema set exists for.
    #[error("unknown taxonomy version: {0:?}")]
    UnknownVersion(String),

    /// A document record did not match its expected shape.
    #[error("invalid {record} record: {reason}")]
    InvalidRecord {
        /// Record type name (e.g. "document").
        record: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// Migration between two taxonomy versions failed.
    #[error("migration from {from} to {to} failed: {reason}")]
    Migration {
        /// Source version tag.
        from: String,
        /// Target version tag.
        to: String,
        /// Reason the migrator gave up.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
