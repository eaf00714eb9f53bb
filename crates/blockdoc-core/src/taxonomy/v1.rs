//! # Taxonomy v1
//!
//! The original block model. Every block carries a required string `id`,
//! the document revision is itself a block (`Document`), and only `Text`
//! is inline.
//!
//! Numeric discriminants follow the v1 block type enumeration:
//!
//! | Code | Kind |
//! |------|------|
//! | 0 | Document |
//! | 1 | Text |
//! | 2 | Link |
//! | 3 | Heading |
//! | 4 | Paragraph |
//! | 5 | Quote |
//! | 6 | List |
//! | 7 | Table |
//! | 8 | Image |
//! | 9 | Alert (reserved, no shape) |
//!
//! Historically Quote was typed with the Paragraph discriminant. Here it
//! has its own tag and code.

use serde::{Deserialize, Serialize};

use super::{
    FieldDefinition, FieldType, Taxonomy, UnionDefinition, VariantDefinition, VariantKind,
    ANY_UNION, INLINE_UNION,
};
use crate::version::TaxonomyVersion;

/// Marker for the v1 taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct V1;

/// Block kinds of taxonomy v1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// A document revision: the root container of a stored tree.
    Document,
    /// Formatted text run.
    Text,
    /// Formatted text navigating elsewhere.
    Link,
    /// Section heading.
    Heading,
    /// Paragraph of inline blocks.
    Paragraph,
    /// Quotation of inline blocks.
    Quote,
    /// Ordered or unordered list of inline blocks.
    List,
    /// Grid of inline cells.
    Table,
    /// Image reference with dimensions.
    Image,
}

impl VariantKind for BlockKind {
    fn all() -> &'static [Self] {
        &[
            Self::Document,
            Self::Text,
            Self::Link,
            Self::Heading,
            Self::Paragraph,
            Self::Quote,
            Self::List,
            Self::Table,
            Self::Image,
        ]
    }

    fn schema_name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Text => "text",
            Self::Link => "link",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Quote => "quote",
            Self::List => "list",
            Self::Table => "table",
            Self::Image => "image",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Text => "Text",
            Self::Link => "Link",
            Self::Heading => "Heading",
            Self::Paragraph => "Paragraph",
            Self::Quote => "Quote",
            Self::List => "List",
            Self::Table => "Table",
            Self::Image => "Image",
        }
    }

    fn code(self) -> u64 {
        match self {
            Self::Document => 0,
            Self::Text => 1,
            Self::Link => 2,
            Self::Heading => 3,
            Self::Paragraph => 4,
            Self::Quote => 5,
            Self::List => 6,
            Self::Table => 7,
            Self::Image => 8,
        }
    }

    fn definition(self) -> VariantDefinition {
        let base = VariantDefinition::new(TaxonomyVersion::V1, self.tag(), self.code()).with_id();
        match self {
            Self::Document => base
                .data_field(FieldDefinition::required("subtitle", FieldType::String))
                .data_field(FieldDefinition::required("createdAt", FieldType::Number))
                .children(ANY_UNION),
            Self::Text => base
                .with_format()
                .data_field(FieldDefinition::required("content", FieldType::String)),
            Self::Link => base
                .with_format()
                .data_field(FieldDefinition::required("content", FieldType::String))
                .data_field(FieldDefinition::required("href", FieldType::String)),
            Self::Heading => base
                .data_field(FieldDefinition::required("content", FieldType::String))
                .data_field(FieldDefinition::required("size", FieldType::Number)),
            Self::Paragraph | Self::Quote => base.children(INLINE_UNION),
            Self::List => base
                .data_field(FieldDefinition::required("ordered", FieldType::Boolean))
                .children(INLINE_UNION),
            Self::Table => base
                .data_field(FieldDefinition::required(
                    "columns",
                    FieldType::list(FieldType::block(INLINE_UNION)),
                ))
                .data_field(FieldDefinition::required(
                    "rows",
                    FieldType::list(FieldType::list(FieldType::block(INLINE_UNION))),
                )),
            Self::Image => base
                .data_field(FieldDefinition::required("src", FieldType::String))
                .data_field(FieldDefinition::required("width", FieldType::Number))
                .data_field(FieldDefinition::required("height", FieldType::Number)),
        }
    }
}

impl Taxonomy for V1 {
    const VERSION: TaxonomyVersion = TaxonomyVersion::V1;
    type Kind = BlockKind;

    fn unions() -> Vec<(&'static str, UnionDefinition)> {
        vec![
            (INLINE_UNION, UnionDefinition::of(Self::VERSION, &["text"])),
            (
                ANY_UNION,
                UnionDefinition::of(
                    Self::VERSION,
                    &["text", "heading", "paragraph", "quote", "list", "table", "image"],
                ),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::SchemaDefinition;

    #[test]
    fn test_every_kind_requires_id() {
        for kind in BlockKind::all() {
            let def = kind.definition();
            assert!(
                def.fields.iter().any(|f| f.name == "id" && f.required),
                "{kind:?} should require an id"
            );
        }
    }

    #[test]
    fn test_discriminants_unique() {
        let mut tags = std::collections::HashSet::new();
        let mut codes = std::collections::HashSet::new();
        for kind in BlockKind::all() {
            assert!(tags.insert(kind.tag()), "duplicate tag {}", kind.tag());
            assert!(codes.insert(kind.code()), "duplicate code {}", kind.code());
        }
    }

    #[test]
    fn test_quote_not_aliased_to_paragraph() {
        assert_ne!(BlockKind::Quote.tag(), BlockKind::Paragraph.tag());
        assert_ne!(BlockKind::Quote.code(), BlockKind::Paragraph.code());
    }

    #[test]
    fn test_definitions_variants_then_unions() {
        let defs = V1::definitions();
        assert_eq!(defs.len(), BlockKind::all().len() + 2);
        assert!(matches!(defs[0].1, SchemaDefinition::Variant(_)));
        assert_eq!(defs[defs.len() - 1].0, ANY_UNION);
    }
}
