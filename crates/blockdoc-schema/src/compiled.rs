//! # Compiled Schema Sets
//!
//! The immutable output of [`SchemaBuilder::compile`](crate::SchemaBuilder::compile).
//! Variants and unions live in one arena; every cross-reference is a
//! [`SchemaId`] index into it, so a cyclic union graph is stored as a flat
//! table rather than an infinite structure.
//!
//! ## Thread Safety
//!
//! `CompiledSchemaSet` is `Send + Sync` and never mutated after
//! compilation. Share it by reference across any number of concurrent
//! validation calls.

use std::collections::HashMap;

use blockdoc_core::TaxonomyVersion;
use serde_json::Value;

use crate::error::SchemaError;

/// Index of a variant or union within one compiled set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

/// A linked field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// Array of the inner type.
    List(Box<CompiledType>),
    /// Nested block conforming to the target.
    Block(SchemaId),
}

/// A linked field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    /// Key in the JSON object.
    pub name: String,
    /// Whether absence is a violation.
    pub required: bool,
    /// Expected value type.
    pub ty: CompiledType,
}

/// A linked children contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledChildren {
    /// Union (or variant) each inline child must satisfy.
    pub target: SchemaId,
    /// Whether identifier strings and identifier lists are accepted.
    pub resolvable: bool,
}

/// A linked block variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledVariant {
    /// Position of this variant in its set.
    pub id: SchemaId,
    /// Schema name (`"heading"`).
    pub name: String,
    /// Discriminant tag (`"Heading"`).
    pub tag: String,
    /// Numeric discriminant, if the variant has one.
    pub code: Option<u64>,
    /// Top-level fields other than `type`, `data` and `children`.
    pub fields: Vec<CompiledField>,
    /// `data` fields, if the variant carries data.
    pub data: Option<Vec<CompiledField>>,
    /// Children contract, if the variant is a container.
    pub children: Option<CompiledChildren>,
    /// Reject undeclared keys.
    pub closed: bool,
}

impl CompiledVariant {
    /// Whether `discriminant` selects this variant.
    pub fn matches(&self, discriminant: &Discriminant<'_>) -> bool {
        match discriminant {
            Discriminant::Tag(tag) => self.tag == *tag,
            Discriminant::Code(code) => self.code == Some(*code),
        }
    }
}

/// A linked union: its flattened variant members in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnion {
    /// Schema name (`"inline"`).
    pub name: String,
    /// Variant members, nested unions expanded, duplicates dropped.
    pub members: Vec<SchemaId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaNode {
    Variant(CompiledVariant),
    Union(CompiledUnion),
}

impl SchemaNode {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Variant(v) => &v.name,
            Self::Union(u) => &u.name,
        }
    }
}

/// The `type` tag of a candidate block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminant<'v> {
    /// Tag name (`"Heading"`).
    Tag(&'v str),
    /// Enumeration ordinal (`5`).
    Code(u64),
}

impl<'v> Discriminant<'v> {
    /// Read the discriminant of a block object.
    pub fn read(block: &'v serde_json::Map<String, Value>) -> DiscriminantRead<'v> {
        match block.get("type") {
            None => DiscriminantRead::Missing,
            Some(Value::String(tag)) => DiscriminantRead::Present(Discriminant::Tag(tag)),
            Some(Value::Number(n)) => match ordinal(n) {
                Some(code) => DiscriminantRead::Present(Discriminant::Code(code)),
                None => DiscriminantRead::Malformed,
            },
            Some(_) => DiscriminantRead::Malformed,
        }
    }
}

// `5` and `5.0` name the same ordinal.
fn ordinal(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

impl std::fmt::Display for Discriminant<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag:?}"),
            Self::Code(code) => write!(f, "{code}"),
        }
    }
}

/// Result of reading `type` from a block object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminantRead<'v> {
    /// `type` holds a string or non-negative integral number.
    Present(Discriminant<'v>),
    /// No `type` key.
    Missing,
    /// `type` holds something else.
    Malformed,
}

/// The fully linked, immutable validators of one taxonomy version.
#[derive(Debug, Clone)]
pub struct CompiledSchemaSet {
    pub(crate) version: TaxonomyVersion,
    pub(crate) nodes: Vec<SchemaNode>,
    pub(crate) by_name: HashMap<String, SchemaId>,
    pub(crate) by_tag: HashMap<String, SchemaId>,
    pub(crate) by_code: HashMap<u64, SchemaId>,
}

impl CompiledSchemaSet {
    /// The taxonomy version this set validates.
    pub fn version(&self) -> TaxonomyVersion {
        self.version
    }

    /// Resolve a schema name, optionally qualified as `"v3/any"`.
    ///
    /// # Errors
    ///
    /// `VersionMismatch` if the qualifier names another version;
    /// `UnknownVariant` if the name (or qualifier) is not known.
    pub fn resolve(&self, name: &str) -> Result<SchemaId, SchemaError> {
        let (qualifier, bare) =
            TaxonomyVersion::split_qualified(name).map_err(|_| SchemaError::UnknownVariant {
                version: self.version,
                name: name.to_string(),
            })?;
        if let Some(found) = qualifier {
            if found != self.version {
                return Err(SchemaError::VersionMismatch {
                    expected: self.version,
                    found,
                });
            }
        }
        self.by_name
            .get(bare)
            .copied()
            .ok_or_else(|| SchemaError::UnknownVariant {
                version: self.version,
                name: bare.to_string(),
            })
    }

    /// Name of a schema.
    pub fn name(&self, id: SchemaId) -> &str {
        self.node(id).name()
    }

    /// The variant behind `id`, or `None` for a union.
    pub fn variant(&self, id: SchemaId) -> Option<&CompiledVariant> {
        match self.node(id) {
            SchemaNode::Variant(v) => Some(v),
            SchemaNode::Union(_) => None,
        }
    }

    /// The union behind `id`, or `None` for a variant.
    pub fn union(&self, id: SchemaId) -> Option<&CompiledUnion> {
        match self.node(id) {
            SchemaNode::Union(u) => Some(u),
            SchemaNode::Variant(_) => None,
        }
    }

    /// Variants accepted by `id`: the flattened members of a union, or the
    /// variant itself.
    pub fn members(&self, id: SchemaId) -> &[SchemaId] {
        match self.node(id) {
            SchemaNode::Union(u) => &u.members,
            SchemaNode::Variant(v) => std::slice::from_ref(&v.id),
        }
    }

    /// The variant registered under `name`.
    ///
    /// # Errors
    ///
    /// `UnknownVariant` if `name` is unknown or names a union.
    pub fn variant_named(&self, name: &str) -> Result<&CompiledVariant, SchemaError> {
        let id = self.resolve(name)?;
        self.variant(id).ok_or_else(|| SchemaError::UnknownVariant {
            version: self.version,
            name: name.to_string(),
        })
    }

    /// Schema names of the variants accepted by `name`, in declared order.
    pub fn union_members(&self, name: &str) -> Result<Vec<&str>, SchemaError> {
        let id = self.resolve(name)?;
        Ok(self.members(id).iter().map(|m| self.name(*m)).collect())
    }

    /// Find the member of `target` selected by `discriminant`, trying
    /// members in declared order and committing to the first match.
    pub fn select(&self, target: SchemaId, discriminant: &Discriminant<'_>) -> Option<SchemaId> {
        self.members(target)
            .iter()
            .copied()
            .find(|id| self.variant(*id).is_some_and(|v| v.matches(discriminant)))
    }

    /// The variant anywhere in this version selected by `discriminant`.
    pub fn variant_for_discriminant(&self, discriminant: &Discriminant<'_>) -> Option<SchemaId> {
        match discriminant {
            Discriminant::Tag(tag) => self.by_tag.get(*tag).copied(),
            Discriminant::Code(code) => self.by_code.get(code).copied(),
        }
    }

    /// Every schema name, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every variant, in registration order.
    pub fn variants(&self) -> impl Iterator<Item = &CompiledVariant> {
        self.nodes.iter().filter_map(|n| match n {
            SchemaNode::Variant(v) => Some(v),
            SchemaNode::Union(_) => None,
        })
    }

    /// Every union, in registration order.
    pub fn unions(&self) -> impl Iterator<Item = &CompiledUnion> {
        self.nodes.iter().filter_map(|n| match n {
            SchemaNode::Union(u) => Some(u),
            SchemaNode::Variant(_) => None,
        })
    }

    /// Human-readable description of a field type.
    pub fn describe_type(&self, ty: &CompiledType) -> String {
        match ty {
            CompiledType::String => "string".to_string(),
            CompiledType::Number => "number".to_string(),
            CompiledType::Boolean => "boolean".to_string(),
            CompiledType::List(inner) => format!("list of {}", self.describe_type(inner)),
            CompiledType::Block(target) => format!("{} block", self.name(*target)),
        }
    }

    // Ids are only minted by the builder that produced this set.
    fn node(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::compile_schemas;
    use serde_json::json;

    fn read(block: &Value) -> DiscriminantRead<'_> {
        Discriminant::read(block.as_object().unwrap())
    }

    #[test]
    fn test_union_members_in_declared_order() {
        let set = compile_schemas(TaxonomyVersion::V2).unwrap();
        assert_eq!(set.union_members("inline").unwrap(), vec!["text", "link"]);
        assert_eq!(set.union_members("heading").unwrap(), vec!["heading"]);
        assert!(matches!(
            set.union_members("figure"),
            Err(SchemaError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_variant_named() {
        let set = compile_schemas(TaxonomyVersion::V4).unwrap();
        let heading = set.variant_named("heading").unwrap();
        assert_eq!(heading.tag, "Heading");
        assert_eq!(heading.code, Some(5));
        assert!(set.variant_named("v4/heading").is_ok());
        assert!(matches!(
            set.variant_named("any"),
            Err(SchemaError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_union_and_variant_lookup_by_id() {
        let set = compile_schemas(TaxonomyVersion::V4).unwrap();
        let any = set.resolve("any").unwrap();
        let heading = set.resolve("heading").unwrap();
        assert_eq!(set.union(any).map(|u| u.name.as_str()), Some("any"));
        assert!(set.variant(any).is_none());
        assert!(set.union(heading).is_none());
        assert_eq!(set.members(heading), &[heading]);
    }

    #[test]
    fn test_discriminant_read() {
        assert_eq!(
            read(&json!({"type": "Heading"})),
            DiscriminantRead::Present(Discriminant::Tag("Heading"))
        );
        assert_eq!(read(&json!({"type": 5})), DiscriminantRead::Present(Discriminant::Code(5)));
        assert_eq!(read(&json!({"data": {}})), DiscriminantRead::Missing);
        assert_eq!(read(&json!({"type": true})), DiscriminantRead::Malformed);
    }

    #[test]
    fn test_integral_float_discriminant_is_ordinal() {
        assert_eq!(read(&json!({"type": 5.0})), DiscriminantRead::Present(Discriminant::Code(5)));
        assert_eq!(read(&json!({"type": 0.0})), DiscriminantRead::Present(Discriminant::Code(0)));
        assert_eq!(read(&json!({"type": 5.5})), DiscriminantRead::Malformed);
        assert_eq!(read(&json!({"type": -1})), DiscriminantRead::Malformed);
        assert_eq!(read(&json!({"type": -2.0})), DiscriminantRead::Malformed);
        assert_eq!(read(&json!({"type": 1e300})), DiscriminantRead::Malformed);
    }
}
