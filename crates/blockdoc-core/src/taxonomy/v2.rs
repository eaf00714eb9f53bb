//! # Taxonomy v2
//!
//! Same kinds and numeric discriminants as v1, with the per-block `id`
//! removed and `Link` promoted into the inline union.

use serde::{Deserialize, Serialize};

use super::{
    FieldDefinition, FieldType, Taxonomy, UnionDefinition, VariantDefinition, VariantKind,
    ANY_UNION, INLINE_UNION,
};
use crate::version::TaxonomyVersion;

/// Marker for the v2 taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct V2;

/// Block kinds of taxonomy v2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Document revision root.
    Document,
    /// Formatted text run.
    Text,
    /// Formatted hyperlink.
    Link,
    /// Section heading.
    Heading,
    /// Paragraph of inline blocks.
    Paragraph,
    /// Quotation of inline blocks.
    Quote,
    /// List of inline blocks.
    List,
    /// Grid of inline cells.
    Table,
    /// Image with dimensions.
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
        let base = VariantDefinition::new(TaxonomyVersion::V2, self.tag(), self.code());
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

impl Taxonomy for V2 {
    const VERSION: TaxonomyVersion = TaxonomyVersion::V2;
    type Kind = BlockKind;

    fn unions() -> Vec<(&'static str, UnionDefinition)> {
        vec![
            (INLINE_UNION, UnionDefinition::of(Self::VERSION, &["text", "link"])),
            (
                ANY_UNION,
                UnionDefinition::of(
                    Self::VERSION,
                    &[
                        "text",
                        "link",
                        "heading",
                        "paragraph",
                        "quote",
                        "list",
                        "table",
                        "image",
                    ],
                ),
            ),
        ]
    }
}
