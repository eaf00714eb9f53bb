//! # Taxonomy Versions
//!
//! Defines the `TaxonomyVersion` enum naming every block taxonomy that has
//! shipped. Each version is a fully independent namespace: there is no
//! inheritance between versions and no in-place upgrade. Every `match` on
//! `TaxonomyVersion` must be exhaustive, so adding a version forces every
//! consumer (schema catalog, CLI, migrators) to handle it.
//!
//! | Version | Change |
//! |---------|--------|
//! | `v1` | Original taxonomy; every block carries a required `id`. |
//! | `v2` | Identity fields dropped; Link joins the inline union. |
//! | `v3` | Root, Ref and Group kinds added. |
//! | `v4` | Container children become resolvable (inline or by identifier). |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BlockdocError;

/// A block taxonomy version tag, carried alongside stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyVersion {
    /// Original taxonomy with per-block identifiers.
    V1,
    /// Identifier-free taxonomy with Text and Link inline.
    V2,
    /// Adds Root, Ref and Group.
    V3,
    /// Resolvable children.
    V4,
}

/// Total number of taxonomy versions.
pub const TAXONOMY_VERSION_COUNT: usize = 4;

impl TaxonomyVersion {
    /// The version new documents are written with.
    pub const LATEST: TaxonomyVersion = TaxonomyVersion::V4;

    /// Returns every version in release order.
    pub fn all() -> &'static [TaxonomyVersion] {
        &[Self::V1, Self::V2, Self::V3, Self::V4]
    }

    /// Returns the lowercase tag for this version (`"v1"` … `"v4"`).
    ///
    /// Matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
            Self::V4 => "v4",
        }
    }

    /// Split a possibly version-qualified schema name (`"v3/any"`) into its
    /// version qualifier and bare name.
    ///
    /// Returns `Ok((None, name))` for unqualified names.
    pub fn split_qualified(name: &str) -> Result<(Option<TaxonomyVersion>, &str), BlockdocError> {
        match name.split_once('/') {
            Some((version, bare)) => Ok((Some(version.parse()?), bare)),
            None => Ok((None, name)),
        }
    }
}

impl std::fmt::Display for TaxonomyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxonomyVersion {
    type Err = BlockdocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            "v3" => Ok(Self::V3),
            "v4" => Ok(Self::V4),
            other => Err(BlockdocError::UnknownVersion(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_versions_count() {
        assert_eq!(TaxonomyVersion::all().len(), TAXONOMY_VERSION_COUNT);
    }

    #[test]
    fn test_all_versions_in_release_order() {
        let all = TaxonomyVersion::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1], "{} should precede {}", pair[0], pair[1]);
        }
        assert_eq!(*all.last().unwrap(), TaxonomyVersion::LATEST);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for version in TaxonomyVersion::all() {
            let parsed: TaxonomyVersion = version.as_str().parse().unwrap();
            assert_eq!(*version, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("V1".parse::<TaxonomyVersion>().is_err()); // case-sensitive
        assert!("v5".parse::<TaxonomyVersion>().is_err());
        assert!("".parse::<TaxonomyVersion>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for version in TaxonomyVersion::all() {
            let json = serde_json::to_string(version).unwrap();
            assert_eq!(json, format!("\"{}\"", version.as_str()));
        }
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(
            TaxonomyVersion::split_qualified("v3/any").unwrap(),
            (Some(TaxonomyVersion::V3), "any")
        );
        assert_eq!(TaxonomyVersion::split_qualified("inline").unwrap(), (None, "inline"));
        assert!(matches!(
            TaxonomyVersion::split_qualified("v9/any"),
            Err(BlockdocError::UnknownVersion(v)) if v == "v9"
        ));
    }
}
