use super::app::{
    AutoStrategy, BelongsTo, Constraint, Field, FieldId, FieldName, FieldPrimitive, FieldTy,
    ForeignKey, ForeignKeyField, HasMany, HasOne, Model, ModelId, PrimaryKey, Schema,
};
use super::Name;
use crate::{stmt, Error, Result};

use indexmap::IndexMap;

/// Declares models at runtime and links them into a [`Schema`].
///
/// ```
/// use gust_core::{schema::{app::AutoStrategy, ModelBuilder}, stmt::Type, Schema};
///
/// let schema = Schema::builder()
///     .namespace("Gust.Example")
///     .model(
///         ModelBuilder::new("Blog")
///             .field("id", Type::I64)
///             .primary_key()
///             .auto(AutoStrategy::Increment)
///             .field("url", Type::String)
///             .has_many("posts", "Post"),
///     )
///     .model(
///         ModelBuilder::new("Post")
///             .field("id", Type::I64)
///             .primary_key()
///             .auto(AutoStrategy::Increment)
///             .field("blog_id", Type::I64)
///             .belongs_to("blog", "Blog", &["blog_id"]),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.models().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    /// Namespace applied to models that do not declare their own
    namespace: Option<String>,

    models: Vec<ModelBuilder>,
}

/// Declaration of a single model.
///
/// Field modifiers (`primary_key`, `nullable`, `auto`, ...) apply to the most
/// recently declared field.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    namespace: Option<String>,
    table_name: Option<String>,
    fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone)]
struct FieldDecl {
    name: String,
    storage_name: Option<String>,
    ty: FieldDeclTy,
    nullable: bool,
    primary_key: bool,
    auto: Option<AutoStrategy>,
    constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
enum FieldDeclTy {
    Primitive(stmt::Type),
    BelongsTo {
        target: String,
        foreign_key: Vec<String>,
    },
    HasMany {
        target: String,
    },
    HasOne {
        target: String,
    },
}

impl Builder {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn model(mut self, model: ModelBuilder) -> Self {
        self.models.push(model);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut ids = IndexMap::new();

        for (index, model) in self.models.iter().enumerate() {
            let name = Name::new(&model.name).upper_camel_case();
            if ids.insert(name.clone(), ModelId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{name}` is declared more than once"
                )));
            }
        }

        let mut models = IndexMap::new();

        for (index, decl) in self.models.iter().enumerate() {
            let model = self.build_model(ModelId(index), decl, &ids)?;
            models.insert(model.id, model);
        }

        let mut schema = Schema { models };
        link_relations(&mut schema)?;
        Ok(schema)
    }

    fn build_model(
        &self,
        id: ModelId,
        decl: &ModelBuilder,
        ids: &IndexMap<String, ModelId>,
    ) -> Result<Model> {
        let name = Name::new(&decl.name);
        let model_name = name.upper_camel_case();

        let Some(namespace) = decl.namespace.clone().or_else(|| self.namespace.clone()) else {
            return Err(Error::invalid_schema(format!(
                "model `{model_name}` has no namespace"
            )));
        };

        let mut fields = Vec::with_capacity(decl.fields.len());

        for (index, field) in decl.fields.iter().enumerate() {
            if decl.fields[..index]
                .iter()
                .any(|prev| Name::new(&prev.name) == Name::new(&field.name))
            {
                return Err(Error::invalid_schema(format!(
                    "field `{model_name}::{}` is declared more than once",
                    field.name
                )));
            }

            let ty = match &field.ty {
                FieldDeclTy::Primitive(ty) => FieldPrimitive { ty: *ty }.into(),
                FieldDeclTy::BelongsTo {
                    target,
                    foreign_key,
                } => {
                    let target_id = resolve_target(ids, &model_name, &field.name, target)?;
                    let target_decl = &self.models[target_id.0];
                    BelongsTo {
                        target: target_id,
                        pair: None,
                        foreign_key: foreign_key_for(
                            id,
                            decl,
                            &field.name,
                            foreign_key,
                            target_id,
                            target_decl,
                        )?,
                    }
                    .into()
                }
                FieldDeclTy::HasMany { target } => HasMany {
                    target: resolve_target(ids, &model_name, &field.name, target)?,
                    pair: FieldId {
                        model: id,
                        index: usize::MAX,
                    },
                }
                .into(),
                FieldDeclTy::HasOne { target } => HasOne {
                    target: resolve_target(ids, &model_name, &field.name, target)?,
                    pair: FieldId {
                        model: id,
                        index: usize::MAX,
                    },
                }
                .into(),
            };

            let field = Field {
                id: id.field(index),
                name: FieldName {
                    app_name: field.name.clone(),
                    storage_name: field.storage_name.clone(),
                },
                ty,
                nullable: field.nullable,
                primary_key: field.primary_key,
                auto: field.auto,
                constraints: field.constraints.clone(),
            };

            verify_field(&model_name, &field)?;
            fields.push(field);
        }

        let primary_key = PrimaryKey {
            fields: fields
                .iter()
                .filter(|field| field.primary_key)
                .map(|field| field.id)
                .collect(),
        };

        if primary_key.fields.is_empty() {
            return Err(Error::invalid_schema(format!(
                "model `{model_name}` has no primary key"
            )));
        }

        Ok(Model {
            id,
            name,
            namespace,
            fields,
            primary_key,
            table_name: decl.table_name.clone(),
        })
    }
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ModelBuilder {
            name: name.into(),
            namespace: None,
            table_name: None,
            fields: vec![],
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Declares a primitive field stored as a column.
    pub fn field(self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.push(name, FieldDeclTy::Primitive(ty))
    }

    /// Declares a relation to `target`, held through the listed foreign key
    /// fields. The foreign key fields must be declared on this model and line
    /// up with the target's primary key.
    pub fn belongs_to(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: &[&str],
    ) -> Self {
        self.push(
            name,
            FieldDeclTy::BelongsTo {
                target: target.into(),
                foreign_key: foreign_key.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn has_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.push(
            name,
            FieldDeclTy::HasMany {
                target: target.into(),
            },
        )
    }

    pub fn has_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.push(
            name,
            FieldDeclTy::HasOne {
                target: target.into(),
            },
        )
    }

    #[track_caller]
    pub fn primary_key(mut self) -> Self {
        self.last_field().primary_key = true;
        self
    }

    #[track_caller]
    pub fn nullable(mut self) -> Self {
        self.last_field().nullable = true;
        self
    }

    #[track_caller]
    pub fn auto(mut self, auto: AutoStrategy) -> Self {
        self.last_field().auto = Some(auto);
        self
    }

    #[track_caller]
    pub fn max_length(mut self, max: u64) -> Self {
        self.last_field()
            .constraints
            .push(Constraint::length_less_than(max));
        self
    }

    #[track_caller]
    pub fn storage_name(mut self, storage_name: impl Into<String>) -> Self {
        self.last_field().storage_name = Some(storage_name.into());
        self
    }

    fn push(mut self, name: impl Into<String>, ty: FieldDeclTy) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            storage_name: None,
            ty,
            nullable: false,
            primary_key: false,
            auto: None,
            constraints: vec![],
        });
        self
    }

    #[track_caller]
    fn last_field(&mut self) -> &mut FieldDecl {
        self.fields
            .last_mut()
            .expect("field modifier used before any field was declared")
    }
}

fn resolve_target(
    ids: &IndexMap<String, ModelId>,
    model_name: &str,
    field_name: &str,
    target: &str,
) -> Result<ModelId> {
    ids.get(&Name::new(target).upper_camel_case())
        .copied()
        .ok_or_else(|| {
            Error::invalid_schema(format!(
                "field `{model_name}::{field_name}` references model `{target}`, which was not \
                 registered with the schema"
            ))
        })
}

fn foreign_key_for(
    id: ModelId,
    decl: &ModelBuilder,
    field_name: &str,
    source_names: &[String],
    target_id: ModelId,
    target: &ModelBuilder,
) -> Result<ForeignKey> {
    let full_name = format!("{}::{}", Name::new(&decl.name).upper_camel_case(), field_name);

    let target_pk: Vec<_> = target
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.primary_key)
        .collect();

    if target_pk.len() != source_names.len() {
        return Err(Error::invalid_schema(format!(
            "foreign key of `{full_name}` has {} field(s) but the target key has {}",
            source_names.len(),
            target_pk.len()
        )));
    }

    let mut fields = vec![];

    for (source_name, (target_index, target_field)) in source_names.iter().zip(target_pk) {
        let Some((source_index, source_field)) = decl
            .fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == *source_name)
        else {
            return Err(Error::invalid_schema(format!(
                "foreign key field `{source_name}` of `{full_name}` is not declared"
            )));
        };

        let (FieldDeclTy::Primitive(source_ty), FieldDeclTy::Primitive(target_ty)) =
            (&source_field.ty, &target_field.ty)
        else {
            return Err(Error::invalid_schema(format!(
                "foreign key of `{full_name}` must reference primitive fields"
            )));
        };

        let compatible =
            source_ty == target_ty || (source_ty.is_integer() && target_ty.is_integer());

        if !compatible {
            return Err(Error::invalid_schema(format!(
                "foreign key field `{source_name}` of `{full_name}` is {} but the target key is {}",
                source_ty.name(),
                target_ty.name()
            )));
        }

        fields.push(ForeignKeyField {
            source: id.field(source_index),
            target: target_id.field(target_index),
        });
    }

    Ok(ForeignKey { fields })
}

fn verify_field(model_name: &str, field: &Field) -> Result<()> {
    let full_name = format!("{model_name}::{}", field.name.app_name);

    if field.primary_key && field.is_relation() {
        return Err(Error::invalid_schema(format!(
            "relation `{full_name}` cannot be part of the primary key"
        )));
    }

    let Some(auto) = field.auto else {
        return Ok(());
    };

    if !field.primary_key {
        return Err(Error::invalid_schema(format!(
            "auto field `{full_name}` must be part of the primary key"
        )));
    }

    match (auto, field.primitive_ty()) {
        (AutoStrategy::Increment, Some(ty)) if ty.is_integer() => Ok(()),
        (AutoStrategy::Uuid, Some(stmt::Type::Uuid)) => Ok(()),
        _ => Err(Error::invalid_schema(format!(
            "auto strategy {auto:?} does not fit the type of `{full_name}`"
        ))),
    }
}

/// Go through all relations and link them to their pairs
fn link_relations(schema: &mut Schema) -> Result<()> {
    let mut has_pairs = vec![];

    for model in schema.models() {
        for field in &model.fields {
            let target = match &field.ty {
                FieldTy::HasMany(has_many) => has_many.target,
                FieldTy::HasOne(has_one) => has_one.target,
                _ => continue,
            };

            let candidates: Vec<_> = schema
                .model(target)
                .belongs_to()
                .filter(|(_, belongs_to)| belongs_to.target == model.id)
                .map(|(field, _)| field.id)
                .collect();

            let pair = match &candidates[..] {
                [pair] => *pair,
                [] => {
                    return Err(Error::invalid_schema(format!(
                        "field `{}` has no matching `BelongsTo` relation on the target model",
                        field.full_name(schema)
                    )))
                }
                _ => {
                    return Err(Error::invalid_schema(format!(
                        "field `{}` matches more than one `BelongsTo` relation on the target model",
                        field.full_name(schema)
                    )))
                }
            };

            has_pairs.push((field.id, pair));
        }
    }

    for (field_id, pair) in has_pairs {
        match &mut schema.models[&field_id.model].fields[field_id.index].ty {
            FieldTy::HasMany(has_many) => has_many.pair = pair,
            FieldTy::HasOne(has_one) => has_one.pair = pair,
            _ => unreachable!(),
        }

        let belongs_to = schema.models[&pair.model].fields[pair.index]
            .ty
            .expect_belongs_to_mut();

        if belongs_to.pair.is_some() {
            return Err(Error::invalid_schema(format!(
                "relation `{}` is paired more than once",
                schema.field(pair).full_name(schema)
            )));
        }

        belongs_to.pair = Some(field_id);
    }

    Ok(())
}
