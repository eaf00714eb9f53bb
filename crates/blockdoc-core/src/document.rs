//! # Document Records
//!
//! Plain data-transfer records owned by collaborators outside the
//! validation core: document metadata, revisions, update responses, and
//! the stored-document envelope that pairs a block tree with the taxonomy
//! version it was written under.
//!
//! These records have no invariants beyond "matches a named shape", which
//! serde decoding already enforces. Block trees inside them stay untyped
//! (`serde_json::Value`) until a compiled schema set accepts them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BlockdocError;
use crate::version::TaxonomyVersion;

/// Document metadata. Revisions are stored separately and point back at
/// the document by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Opaque document identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Creation time (ISO 8601 on the wire).
    pub created_at: DateTime<Utc>,
    /// Last update time (ISO 8601 on the wire).
    pub updated_at: DateTime<Utc>,
    /// Identifier of the owning user.
    pub owner_id: String,
}

impl Document {
    /// Decode a metadata record from an untyped value.
    pub fn from_value(value: Value) -> Result<Self, BlockdocError> {
        serde_json::from_value(value).map_err(|e| BlockdocError::InvalidRecord {
            record: "document",
            reason: e.to_string(),
        })
    }
}

/// One revision of a document: a pointer to the root block of its tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRevision {
    /// Owning document.
    pub document_id: String,
    /// Revision creation time.
    pub created_at: DateTime<Utc>,
    /// Id of the revision's root block.
    pub block_id: String,
}

/// Response to a document update request.
///
/// Either `success` with the new revision, or a failure carrying an error
/// message and every violation found in the submitted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpdateResponse<V> {
    /// Whether the update was accepted.
    pub success: bool,
    /// The revision created by an accepted update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<DocumentRevision>,
    /// Summary of why the update was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Individual violations of a rejected update.
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<V>,
}

impl<V> DocumentUpdateResponse<V> {
    /// An accepted update.
    pub fn accepted(revision: DocumentRevision) -> Self {
        Self {
            success: true,
            revision: Some(revision),
            error: None,
            violations: Vec::new(),
        }
    }

    /// A rejected update.
    pub fn rejected(error: impl Into<String>, violations: Vec<V>) -> Self {
        Self {
            success: false,
            revision: None,
            error: Some(error.into()),
            violations,
        }
    }
}

/// A block tree together with the taxonomy version it must be validated
/// against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Taxonomy the tree was written under.
    pub schema_version: TaxonomyVersion,
    /// Root block of the tree, not yet validated.
    pub root: Value,
}

impl StoredDocument {
    /// Key that marks a value as a stored-document envelope.
    pub const VERSION_KEY: &'static str = "schemaVersion";

    /// Whether `value` looks like an envelope rather than a bare block.
    pub fn is_envelope(value: &Value) -> bool {
        value.get(Self::VERSION_KEY).is_some()
    }

    /// Decode an envelope from an untyped value.
    pub fn from_value(value: Value) -> Result<Self, BlockdocError> {
        serde_json::from_value(value).map_err(|e| BlockdocError::InvalidRecord {
            record: "stored document",
            reason: e.to_string(),
        })
    }

    /// Run a migrator over the tree.
    ///
    /// The migrator's source version must equal the envelope's version.
    pub fn migrate(self, migrator: &dyn Migrator) -> Result<Self, BlockdocError> {
        if migrator.source() != self.schema_version {
            return Err(BlockdocError::Migration {
                from: self.schema_version.to_string(),
                to: migrator.target().to_string(),
                reason: format!("migrator expects {} documents", migrator.source()),
            });
        }
        Ok(Self {
            schema_version: migrator.target(),
            root: migrator.migrate(self.root)?,
        })
    }
}

/// Converts a block tree from one taxonomy version to another.
///
/// Implementations live with the storage layer; the core only defines the
/// seam so a migrated tree can be re-validated against its new version.
pub trait Migrator {
    /// Version of trees this migrator accepts.
    fn source(&self) -> TaxonomyVersion;

    /// Version of trees this migrator produces.
    fn target(&self) -> TaxonomyVersion;

    /// Convert one tree.
    fn migrate(&self, root: Value) -> Result<Value, BlockdocError>;
}
