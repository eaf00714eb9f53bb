//! # Taxonomy v4
//!
//! Kinds and discriminants are those of v3. Containers switch to
//! resolvable children: every entry of `children` on Root, Group,
//! Paragraph, Quote and List may be an inline block object *or* an
//! identifier string *or* a list of identifier strings, the latter two
//! being deferred lookups into an external block store. `Group` joins the
//! `any` union.

use serde::{Deserialize, Serialize};

use super::{
    FieldDefinition, FieldType, Taxonomy, UnionDefinition, VariantDefinition, VariantKind,
    ANY_UNION, INLINE_UNION,
};
use crate::version::TaxonomyVersion;

/// Marker for the v4 taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct V4;

/// Block kinds of taxonomy v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Identified tree root.
    Root,
    /// Pointer to a root by id.
    Ref,
    /// Formatted text run.
    Text,
    /// Formatted hyperlink.
    Link,
    /// Section heading.
    Heading,
    /// Paragraph of inline or referenced blocks.
    Paragraph,
    /// Quotation of inline or referenced blocks.
    Quote,
    /// List of inline or referenced blocks.
    List,
    /// Grid of inline cells.
    Table,
    /// Image with dimensions.
    Image,
    /// Data-less container.
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
        let base = VariantDefinition::new(TaxonomyVersion::V4, self.tag(), self.code());
        match self {
            Self::Root => base
                .with_id()
                .field(FieldDefinition::optional(
                    "tags",
                    FieldType::list(FieldType::String),
                ))
                .resolvable_children(ANY_UNION),
            Self::Ref => base
                .data_field(FieldDefinition::required("id", FieldType::String))
                .closed(),
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
            Self::Paragraph | Self::Quote => base.resolvable_children(INLINE_UNION),
            Self::List => base
                .data_field(FieldDefinition::required("ordered", FieldType::Boolean))
                .resolvable_children(INLINE_UNION),
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
            Self::Group => base.resolvable_children(ANY_UNION),
        }
    }
}

impl Taxonomy for V4 {
    const VERSION: TaxonomyVersion = TaxonomyVersion::V4;
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
                        "group",
                    ],
                ),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers_are_resolvable() {
        for kind in BlockKind::all() {
            if let Some(children) = kind.definition().children {
                assert!(children.resolvable, "{kind:?} children should be resolvable");
            }
        }
    }

    #[test]
    fn test_table_cells_stay_inline_objects() {
        let def = BlockKind::Table.definition();
        assert!(def.children.is_none());
        assert_eq!(def.references().len(), 2);
    }
}
