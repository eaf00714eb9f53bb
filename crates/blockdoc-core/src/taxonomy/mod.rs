//! # Block Taxonomy
//!
//! Declarative description of every block variant and union, per taxonomy
//! version. Nothing in this module validates anything: it is the single
//! source of truth that `blockdoc-schema` compiles into validators.
//!
//! ## Structure
//!
//! Each version lives in its own module ([`v1`] … [`v4`]) with its own
//! exhaustive `BlockKind` enum. A kind's [`VariantKind::definition`] is a
//! single `match` over the enum, so a new kind cannot be added without
//! giving it a shape. Versions share the definition *types* declared here,
//! never definitions themselves.
//!
//! ## References
//!
//! A field or children slot that holds blocks names its allowed union by
//! [`SchemaRef`] instead of embedding the union. Unions are mutually and
//! self-referential (`any` contains `root`, whose children are `any`), so
//! they can only be linked once every name has been declared.

pub mod v1;
pub mod v2;
pub mod v3;
pub mod v4;

use serde::{Deserialize, Serialize};

use crate::version::TaxonomyVersion;

/// Name of the union permitted inside text-flow containers.
pub const INLINE_UNION: &str = "inline";

/// Name of the union of every block allowed in a document body.
pub const ANY_UNION: &str = "any";

/// A by-name reference to a variant or union in the same taxonomy version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRef(pub String);

impl SchemaRef {
    /// Reference the schema registered under `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The referenced name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The value type a single field must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// An array whose every element has the inner type.
    List(Box<FieldType>),
    /// A nested block conforming to the referenced variant or union.
    Block(SchemaRef),
}

impl FieldType {
    /// Array of `inner`.
    pub fn list(inner: FieldType) -> Self {
        Self::List(Box::new(inner))
    }

    /// A nested block drawn from the named union.
    pub fn block(union: &str) -> Self {
        Self::Block(SchemaRef::named(union))
    }

    /// Collect every schema name this type refers to.
    pub fn references(&self) -> Vec<&SchemaRef> {
        match self {
            Self::String | Self::Number | Self::Boolean => Vec::new(),
            Self::List(inner) => inner.references(),
            Self::Block(target) => vec![target],
        }
    }
}

/// One named field in a block or its `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Key in the JSON object.
    pub name: String,
    /// Expected value type.
    pub ty: FieldType,
    /// Whether absence is a violation.
    pub required: bool,
}

impl FieldDefinition {
    /// A required field.
    pub fn required(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: true,
        }
    }

    /// An optional field.
    pub fn optional(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: false,
        }
    }
}

/// Shape of a container's `children` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenSpec {
    /// Union every inline child must satisfy.
    pub union: SchemaRef,
    /// Whether a child may instead be an identifier or list of identifiers.
    pub resolvable: bool,
}

/// The full contract of one block variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDefinition {
    /// The taxonomy version this definition belongs to.
    pub version: TaxonomyVersion,
    /// Discriminant tag (`"Heading"`).
    pub tag: String,
    /// Numeric discriminant (ordinal of the version's block type enumeration).
    pub code: Option<u64>,
    /// Top-level fields other than `type`, `data` and `children`.
    pub fields: Vec<FieldDefinition>,
    /// Fields of the `data` object; `None` when the variant carries no data.
    pub data: Option<Vec<FieldDefinition>>,
    /// Children contract; `None` for leaf variants.
    pub children: Option<ChildrenSpec>,
    /// Reject keys that are not declared.
    pub closed: bool,
}

impl VariantDefinition {
    /// A leaf variant with no fields, data or children.
    pub fn new(version: TaxonomyVersion, tag: &str, code: u64) -> Self {
        Self {
            version,
            tag: tag.to_string(),
            code: Some(code),
            fields: Vec::new(),
            data: None,
            children: None,
            closed: false,
        }
    }

    /// Add a top-level field.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add the required string `id` identity field.
    pub fn with_id(self) -> Self {
        self.field(FieldDefinition::required("id", FieldType::String))
    }

    /// Add a field to the `data` object, creating it if necessary.
    pub fn data_field(mut self, field: FieldDefinition) -> Self {
        self.data.get_or_insert_with(Vec::new).push(field);
        self
    }

    /// Add the four required formatting flags to the `data` object.
    pub fn with_format(self) -> Self {
        FORMAT_FLAGS.iter().fold(self, |def, flag| {
            def.data_field(FieldDefinition::required(flag, FieldType::Boolean))
        })
    }

    /// Children must be inline objects of `union`.
    pub fn children(mut self, union: &str) -> Self {
        self.children = Some(ChildrenSpec {
            union: SchemaRef::named(union),
            resolvable: false,
        });
        self
    }

    /// Children may be objects of `union` or identifier references.
    pub fn resolvable_children(mut self, union: &str) -> Self {
        self.children = Some(ChildrenSpec {
            union: SchemaRef::named(union),
            resolvable: true,
        });
        self
    }

    /// Reject undeclared keys.
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Every schema name referenced by fields, data and children.
    pub fn references(&self) -> Vec<&SchemaRef> {
        let mut refs: Vec<&SchemaRef> = self
            .fields
            .iter()
            .chain(self.data.iter().flatten())
            .flat_map(|f| f.ty.references())
            .collect();
        if let Some(children) = &self.children {
            refs.push(&children.union);
        }
        refs
    }
}

/// A named, ordered, closed set of variants (or nested unions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionDefinition {
    /// The taxonomy version this union belongs to.
    pub version: TaxonomyVersion,
    /// Members in the order discriminants are tried.
    pub members: Vec<SchemaRef>,
}

impl UnionDefinition {
    /// A union over the named members.
    pub fn of(version: TaxonomyVersion, members: &[&str]) -> Self {
        Self {
            version,
            members: members.iter().map(|m| SchemaRef::named(*m)).collect(),
        }
    }
}

/// Anything that can be registered under a schema name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaDefinition {
    /// A concrete block variant.
    Variant(VariantDefinition),
    /// A union of variants.
    Union(UnionDefinition),
}

impl SchemaDefinition {
    /// The version the definition was authored for.
    pub fn version(&self) -> TaxonomyVersion {
        match self {
            Self::Variant(v) => v.version,
            Self::Union(u) => u.version,
        }
    }

    /// Every schema name this definition refers to.
    pub fn references(&self) -> Vec<&SchemaRef> {
        match self {
            Self::Variant(v) => v.references(),
            Self::Union(u) => u.members.iter().collect(),
        }
    }
}

/// The four formatting flags shared by Text and Link.
pub const FORMAT_FLAGS: [&str; 4] = ["bold", "italic", "underline", "strikethrough"];

/// One block kind of a specific taxonomy version.
pub trait VariantKind: Copy + std::fmt::Debug + 'static {
    /// Every kind, in discriminant order.
    fn all() -> &'static [Self];

    /// Schema name the variant is registered under (`"heading"`).
    fn schema_name(self) -> &'static str;

    /// Discriminant tag (`"Heading"`).
    fn tag(self) -> &'static str;

    /// Numeric discriminant.
    fn code(self) -> u64;

    /// The variant's full contract.
    fn definition(self) -> VariantDefinition;
}

/// A complete taxonomy: one version, its kinds, and its named unions.
pub trait Taxonomy {
    /// The version tag this taxonomy is stored under.
    const VERSION: TaxonomyVersion;

    /// The version's block kind enumeration.
    type Kind: VariantKind;

    /// Named unions, in registration order.
    fn unions() -> Vec<(&'static str, UnionDefinition)>;

    /// Every named definition: variants first, then unions.
    fn definitions() -> Vec<(String, SchemaDefinition)> {
        let variants = Self::Kind::all().iter().map(|kind| {
            (
                kind.schema_name().to_string(),
                SchemaDefinition::Variant(kind.definition()),
            )
        });
        let unions = Self::unions()
            .into_iter()
            .map(|(name, union)| (name.to_string(), SchemaDefinition::Union(union)));
        variants.chain(unions).collect()
    }
}
