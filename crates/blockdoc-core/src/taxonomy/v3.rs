//! # Taxonomy v3
//!
//! Adds indirection and grouping: `Root` (an identified, taggable tree that
//! `Ref` blocks point at), `Ref` (a by-identifier pointer to a root) and
//! `Group` (a data-less container of any blocks). The document revision is
//! no longer a block; revisions are records that point at a root id.
//!
//! `Ref.data.id` is a named lookup, never a child: validation does not
//! follow it.
//!
//! | Code | Kind |
//! |------|------|
//! | 0 | Document (reserved, no shape) |
//! | 1 | Root |
//! | 2 | Ref |
//! | 3 | Text |
//! | 4 | Link |
//! | 5 | Heading |
//! | 6 | Paragraph |
//! | 7 | Quote |
//! | 8 | List |
//! | 9 | Table |
//! | 10 | Image |
//! | 11 | Alert (reserved, no shape) |
//! | 12 | Group |

use serde::{Deserialize, Serialize};

use super::{
    FieldDefinition, FieldType, Taxonomy, UnionDefinition, VariantDefinition, VariantKind,
    ANY_UNION, INLINE_UNION,
};
use crate::version::TaxonomyVersion;

/// Marker for the v3 taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct V3;

/// Block kinds of taxonomy v3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Identified tree root, target of `Ref`.
    Root,
    /// Pointer to a root by id.
    Ref,
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
    /// Data-less container of any blocks.
    Group,
}

impl VariantKind for BlockKind {
    fn all() -> &'static [Self] {
        &[
            Self::Root,
            Self::Ref,
            Self::Text,
            Self::Link,
            Self::Heading,
            Self::Paragraph,
            Self::Quote,
            Self::List,
            Self::Table,
            Self::Image,
            Self::Group,
        ]
    }

    fn schema_name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Ref => "ref",
            Self::Text => "text",
            Self::Link => "link",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Quote => "quote",
            Self::List => "list",
            Self::Table => "table",
            Self::Image => "image",
            Self::Group => "group",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Ref => "Ref",
            Self::Text => "Text",
            Self::Link => "Link",
            Self::Heading => "Heading",
            Self::Paragraph => "Paragraph",
            Self::Quote => "Quote",
            Self::List => "List",
            Self::Table => "Table",
            Self::Image => "Image",
            Self::Group => "Group",
        }
    }

    fn code(self) -> u64 {
        match self {
            Self::Root => 1,
            Self::Ref => 2,
            Self::Text => 3,
            Self::Link => 4,
            Self::Heading => 5,
            Self::Paragraph => 6,
            Self::Quote => 7,
            Self::List => 8,
            Self::Table => 9,
            Self::Image => 10,
            Self::Group => 12,
        }
    }

    fn definition(self) -> VariantDefinition {
        let base = VariantDefinition::new(TaxonomyVersion::V3, self.tag(), self.code());
        match self {
            Self::Root => base
                .with_id()
                .field(FieldDefinition::optional(
                    "tags",
                    FieldType::list(FieldType::String),
                ))
                .children(ANY_UNION),
            Self::Ref => base.data_field(FieldDefinition::required("id", FieldType::String)),
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
            Self::Group => base.children(ANY_UNION),
        }
    }
}

impl Taxonomy for V3 {
    const VERSION: TaxonomyVersion = TaxonomyVersion::V3;
    type Kind = BlockKind;

    fn unions() -> Vec<(&'static str, UnionDefinition)> {
        vec![
            (INLINE_UNION, UnionDefinition::of(Self::VERSION, &["text", "link"])),
            (
                ANY_UNION,
                UnionDefinition::of(
                    Self::VERSION,
                    &[
                        "root",
                        "ref",
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
