use crate::AccessorTable;

use gust_core::{
    schema::app::{FieldId, Model, ModelId},
    Error, Result, Schema,
};
use std::{collections::HashMap, sync::Arc};

/// The entity types of a schema in dependency order: principals before the
/// dependents that reference them.
///
/// A catalog is derived from one schema and never changes. Build it once and
/// share it between save operations.
#[derive(Debug)]
pub struct Catalog {
    schema: Arc<Schema>,

    /// Descriptors in dependency order
    types: Vec<EntityTypeDescriptor>,

    /// Model to position in `types`
    positions: HashMap<ModelId, usize>,

    accessors: AccessorTable,
}

/// Describes one persisted entity type.
#[derive(Debug, Clone)]
pub struct EntityTypeDescriptor {
    pub model: ModelId,

    /// `ShortName:#Namespace`
    pub wire_name: String,

    /// `Namespace.ShortName`
    pub full_name: String,

    /// Key fields, in key order
    pub primary_key: Vec<FieldId>,

    pub foreign_keys: Vec<ForeignKeyDescriptor>,

    /// Types referenced by this type's foreign keys
    pub dependencies: Vec<ModelId>,
}

/// Foreign key fields held by a dependent type
#[derive(Debug, Clone)]
pub struct ForeignKeyDescriptor {
    /// The `BelongsTo` relation owning the key
    pub relation: FieldId,

    /// The referenced (principal) type
    pub principal: ModelId,

    /// `(source, target)` pairs. Sources live on the dependent, targets are
    /// principal key fields.
    pub fields: Vec<(FieldId, FieldId)>,
}

impl Catalog {
    /// Orders every model of `schema` by dependency.
    ///
    /// Models are first sorted by full name. The first remaining model whose
    /// dependencies have all been emitted is then emitted, repeatedly, which
    /// yields the same order on every run. Fails when a dependency cycle
    /// leaves no model eligible.
    pub fn describe_types(schema: &Arc<Schema>) -> Result<Catalog> {
        let mut remaining: Vec<_> = schema.models().map(EntityTypeDescriptor::new).collect();
        remaining.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        let mut types: Vec<EntityTypeDescriptor> = Vec::with_capacity(remaining.len());
        let mut positions = HashMap::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let Some(index) = remaining.iter().position(|descriptor| {
                descriptor
                    .dependencies
                    .iter()
                    .all(|dependency| positions.contains_key(dependency))
            }) else {
                return Err(Error::dependency_cycle(
                    remaining.into_iter().map(|descriptor| descriptor.full_name),
                ));
            };

            let descriptor = remaining.remove(index);
            positions.insert(descriptor.model, types.len());
            types.push(descriptor);
        }

        tracing::debug!(
            types = types.len(),
            order = ?types.iter().map(|ty| &ty.full_name[..]).collect::<Vec<_>>(),
            "built entity type catalog"
        );

        Ok(Catalog {
            accessors: AccessorTable::new(schema),
            schema: schema.clone(),
            types,
            positions,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Descriptors in dependency order
    pub fn types(&self) -> &[EntityTypeDescriptor] {
        &self.types
    }

    pub fn accessors(&self) -> &AccessorTable {
        &self.accessors
    }

    /// The descriptor of `model`.
    #[track_caller]
    pub fn get(&self, model: ModelId) -> &EntityTypeDescriptor {
        &self.types[self.positions[&model]]
    }

    /// Position of `model` in dependency order
    pub fn position(&self, model: ModelId) -> Option<usize> {
        self.positions.get(&model).copied()
    }

    /// Resolves a `ShortName:#Namespace` type name.
    pub fn by_wire_name(&self, wire_name: &str) -> Result<&EntityTypeDescriptor> {
        self.schema
            .model_by_wire_name(wire_name.trim())
            .map(|model| self.get(model.id))
            .ok_or_else(|| Error::unknown_entity_type(wire_name))
    }
}

impl EntityTypeDescriptor {
    fn new(model: &Model) -> EntityTypeDescriptor {
        EntityTypeDescriptor {
            model: model.id,
            wire_name: model.wire_name(),
            full_name: model.full_name(),
            primary_key: model.primary_key.fields.clone(),
            foreign_keys: model
                .belongs_to()
                .map(|(field, belongs_to)| ForeignKeyDescriptor {
                    relation: field.id,
                    principal: belongs_to.target,
                    fields: belongs_to
                        .foreign_key
                        .fields
                        .iter()
                        .map(|fk_field| (fk_field.source, fk_field.target))
                        .collect(),
                })
                .collect(),
            dependencies: model.dependencies(),
        }
    }
}
