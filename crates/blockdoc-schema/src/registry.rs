//! # Schema Registry
//!
//! Two-phase construction of a [`CompiledSchemaSet`] for one taxonomy
//! version:
//!
//! 1. **Declare.** Every variant and union name gets a slot (and a
//!    [`SchemaId`]) before anything refers to it. Declaring is idempotent.
//! 2. **Link.** Definitions are attached to their slots; references inside
//!    them stay by-name until [`SchemaBuilder::compile`] maps every name to
//!    its slot index.
//!
//! Because linking only maps names to indices, self-referential and
//! forward-referential unions (`any` → `root` → children `any`) need no
//! special handling, and the resulting set is a flat arena.
//!
//! `compile` is the single consistency gate for a taxonomy: a set that
//! compiles has no dangling references and no colliding discriminants.

use std::collections::{BTreeSet, HashMap, HashSet};

use blockdoc_core::{
    FieldDefinition, FieldType, SchemaDefinition, Taxonomy, TaxonomyVersion, UnionDefinition,
    VariantDefinition,
};

use crate::compiled::{
    CompiledChildren, CompiledField, CompiledSchemaSet, CompiledType, CompiledUnion,
    CompiledVariant, SchemaId, SchemaNode,
};
use crate::error::SchemaError;

#[derive(Debug)]
struct Slot {
    name: String,
    definition: Option<SchemaDefinition>,
}

/// Builder for one taxonomy version's compiled schema set.
#[derive(Debug)]
pub struct SchemaBuilder {
    version: TaxonomyVersion,
    slots: Vec<Slot>,
    index: HashMap<String, SchemaId>,
}

impl SchemaBuilder {
    /// Start an empty build for `version`.
    pub fn new(version: TaxonomyVersion) -> Self {
        Self {
            version,
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The version being built.
    pub fn version(&self) -> TaxonomyVersion {
        self.version
    }

    /// Declare a placeholder for `name`, returning its id.
    ///
    /// Declaring an already-declared name returns the existing id.
    pub fn declare(&mut self, name: &str) -> SchemaId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = SchemaId(self.slots.len());
        self.slots.push(Slot {
            name: name.to_string(),
            definition: None,
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Attach a definition to `name`, declaring it first if necessary.
    ///
    /// # Errors
    ///
    /// `VersionMismatch` if the definition was authored for another
    /// version; `DuplicateVariant` if `name` already has a definition.
    pub fn register(&mut self, name: &str, definition: SchemaDefinition) -> Result<(), SchemaError> {
        if definition.version() != self.version {
            return Err(SchemaError::VersionMismatch {
                expected: self.version,
                found: definition.version(),
            });
        }
        let id = self.declare(name);
        let slot = &mut self.slots[id.0];
        if slot.definition.is_some() {
            return Err(SchemaError::DuplicateVariant {
                version: self.version,
                name: name.to_string(),
            });
        }
        slot.definition = Some(definition);
        Ok(())
    }

    /// Look up a declared name.
    ///
    /// # Errors
    ///
    /// `UnknownVariant` if `name` was never declared.
    pub fn resolve(&self, name: &str) -> Result<SchemaId, SchemaError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownVariant {
                version: self.version,
                name: name.to_string(),
            })
    }

    /// Declare and register every variant and union of taxonomy `T`.
    ///
    /// All names are declared before any definition is attached.
    pub fn register_taxonomy<T: Taxonomy>(&mut self) -> Result<(), SchemaError> {
        if T::VERSION != self.version {
            return Err(SchemaError::VersionMismatch {
                expected: self.version,
                found: T::VERSION,
            });
        }
        let definitions = T::definitions();
        for (name, _) in &definitions {
            self.declare(name);
        }
        for (name, definition) in definitions {
            self.register(&name, definition)?;
        }
        Ok(())
    }

    /// Link every reference and freeze the set.
    ///
    /// # Errors
    ///
    /// `UnresolvedReference` listing every name that is referenced but not
    /// declared, or declared but never defined; `DuplicateDiscriminant` if
    /// two variants share a tag or numeric code.
    pub fn compile(self) -> Result<CompiledSchemaSet, SchemaError> {
        self.check_references()?;
        let (by_tag, by_code) = self.index_discriminants()?;

        let mut nodes = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            let node = match &slot.definition {
                Some(SchemaDefinition::Variant(def)) => {
                    SchemaNode::Variant(self.link_variant(SchemaId(i), &slot.name, def))
                }
                Some(SchemaDefinition::Union(def)) => {
                    SchemaNode::Union(self.link_union(SchemaId(i), &slot.name, def))
                }
                // check_references rejects undefined slots.
                None => {
                    return Err(SchemaError::UnresolvedReference {
                        version: self.version,
                        names: vec![slot.name.clone()],
                    })
                }
            };
            nodes.push(node);
        }

        let set = CompiledSchemaSet {
            version: self.version,
            nodes,
            by_name: self.index,
            by_tag,
            by_code,
        };
        tracing::debug!(
            version = %set.version,
            variants = set.variants().count(),
            unions = set.unions().count(),
            "compiled schema set"
        );
        Ok(set)
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        let mut unresolved = BTreeSet::new();
        for slot in &self.slots {
            match &slot.definition {
                None => {
                    unresolved.insert(slot.name.clone());
                }
                Some(definition) => {
                    for reference in definition.references() {
                        if !self.index.contains_key(reference.as_str()) {
                            unresolved.insert(reference.as_str().to_string());
                        }
                    }
                }
            }
        }
        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::UnresolvedReference {
                version: self.version,
                names: unresolved.into_iter().collect(),
            })
        }
    }

    #[allow(clippy::type_complexity)]
    fn index_discriminants(
        &self,
    ) -> Result<(HashMap<String, SchemaId>, HashMap<u64, SchemaId>), SchemaError> {
        let mut by_tag: HashMap<String, SchemaId> = HashMap::new();
        let mut by_code: HashMap<u64, SchemaId> = HashMap::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(SchemaDefinition::Variant(def)) = &slot.definition else {
                continue;
            };
            if let Some(prior) = by_tag.insert(def.tag.clone(), SchemaId(i)) {
                return Err(self.collision(def.tag.clone(), prior, &slot.name));
            }
            if let Some(code) = def.code {
                if let Some(prior) = by_code.insert(code, SchemaId(i)) {
                    return Err(self.collision(code.to_string(), prior, &slot.name));
                }
            }
        }
        Ok((by_tag, by_code))
    }

    fn collision(&self, discriminant: String, first: SchemaId, second: &str) -> SchemaError {
        SchemaError::DuplicateDiscriminant {
            version: self.version,
            discriminant,
            first: self.slots[first.0].name.clone(),
            second: second.to_string(),
        }
    }

    fn link_variant(&self, id: SchemaId, name: &str, def: &VariantDefinition) -> CompiledVariant {
        CompiledVariant {
            id,
            name: name.to_string(),
            tag: def.tag.clone(),
            code: def.code,
            fields: self.link_fields(&def.fields),
            data: def.data.as_ref().map(|fields| self.link_fields(fields)),
            children: def.children.as_ref().map(|spec| CompiledChildren {
                target: self.index[spec.union.as_str()],
                resolvable: spec.resolvable,
            }),
            closed: def.closed,
        }
    }

    fn link_fields(&self, fields: &[FieldDefinition]) -> Vec<CompiledField> {
        fields
            .iter()
            .map(|f| CompiledField {
                name: f.name.clone(),
                required: f.required,
                ty: self.link_type(&f.ty),
            })
            .collect()
    }

    fn link_type(&self, ty: &FieldType) -> CompiledType {
        match ty {
            FieldType::String => CompiledType::String,
            FieldType::Number => CompiledType::Number,
            FieldType::Boolean => CompiledType::Boolean,
            FieldType::List(inner) => CompiledType::List(Box::new(self.link_type(inner))),
            FieldType::Block(target) => CompiledType::Block(self.index[target.as_str()]),
        }
    }

    /// Flatten nested unions into their variants, in declared order.
    ///
    /// A union that (transitively) contains itself contributes its members
    /// once; the visited set is what terminates the expansion.
    fn link_union(&self, id: SchemaId, name: &str, def: &UnionDefinition) -> CompiledUnion {
        let mut members = Vec::new();
        let mut seen_variants = HashSet::new();
        let mut visited_unions = HashSet::from([id]);
        self.flatten_members(def, &mut members, &mut seen_variants, &mut visited_unions);
        CompiledUnion {
            name: name.to_string(),
            members,
        }
    }

    fn flatten_members(
        &self,
        def: &UnionDefinition,
        members: &mut Vec<SchemaId>,
        seen_variants: &mut HashSet<SchemaId>,
        visited_unions: &mut HashSet<SchemaId>,
    ) {
        for member in &def.members {
            let member_id = self.index[member.as_str()];
            match &self.slots[member_id.0].definition {
                Some(SchemaDefinition::Variant(_)) => {
                    if seen_variants.insert(member_id) {
                        members.push(member_id);
                    }
                }
                Some(SchemaDefinition::Union(nested)) => {
                    if visited_unions.insert(member_id) {
                        self.flatten_members(nested, members, seen_variants, visited_unions);
                    }
                }
                None => {}
            }
        }
    }
}
