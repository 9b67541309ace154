//! Client metadata describing every entity type of a schema.

use crate::AutoGeneratedKeyType;

use gust_core::{
    schema::app::{BelongsTo, Field, FieldId, FieldTy, Model},
    stmt::Type,
    Error, Result, Schema,
};
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Resource name to `ShortName:#Namespace`
    pub resource_entity_type_map: BTreeMap<String, String>,

    pub structural_types: Vec<TypeMetadata>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetadata {
    pub short_name: String,
    pub namespace: String,
    pub auto_generated_key_type: AutoGeneratedKeyType,
    pub default_resource_name: String,
    pub data_properties: Vec<DataProperty>,
    pub navigation_properties: Vec<NavigationProperty>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProperty {
    pub name: String,

    pub data_type: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_part_of_key: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Json>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    pub name: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProperty {
    pub name: String,

    /// `ShortName:#Namespace` of the related type
    pub entity_type_name: String,

    pub is_scalar: bool,

    /// Same on both ends of a relationship
    pub association_name: String,

    /// Set on the dependent end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key_names: Option<Vec<String>>,

    /// Set on the principal end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inv_foreign_key_names: Option<Vec<String>>,
}

/// Describes every model of `schema`, in schema order.
pub fn extract(schema: &Schema) -> Metadata {
    let structural_types: Vec<_> = schema
        .models()
        .map(|model| type_metadata(schema, model))
        .collect();

    let resource_entity_type_map = schema
        .models()
        .map(|model| (model.table_name(), model.wire_name()))
        .collect();

    Metadata {
        resource_entity_type_map,
        structural_types,
    }
}

impl Metadata {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let ret = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };

        ret.map_err(|err| Error::from(anyhow::Error::from(err)))
    }
}

fn type_metadata(schema: &Schema, model: &Model) -> TypeMetadata {
    let key_is_foreign_key = model
        .primary_key_fields()
        .all(|field| model.is_foreign_key(field.id));
    let key_is_generated = model.primary_key_fields().any(|field| field.auto.is_some());

    let auto_generated_key_type = if key_is_generated && !key_is_foreign_key {
        AutoGeneratedKeyType::Identity
    } else {
        AutoGeneratedKeyType::None
    };

    TypeMetadata {
        short_name: model.name.upper_camel_case(),
        namespace: model.namespace.clone(),
        auto_generated_key_type,
        default_resource_name: model.table_name(),
        data_properties: model.primitives().map(data_property).collect(),
        navigation_properties: model
            .fields
            .iter()
            .filter_map(|field| navigation_property(schema, model, field))
            .collect(),
    }
}

fn data_property(field: &Field) -> DataProperty {
    let ty = field.primitive_ty().copied().unwrap_or(Type::String);

    let default_value = match ty {
        _ if field.nullable => None,
        ty if ty.is_numeric() => Some(Json::from(0)),
        Type::String => Some(Json::from("")),
        _ => None,
    };

    let mut validators = vec![];

    if !field.nullable {
        validators.push(Validator {
            name: "required",
            max_length: None,
        });
    }

    if let Some(max) = field.max_length() {
        validators.push(Validator {
            name: "maxLength",
            max_length: Some(max),
        });
    }

    validators.push(Validator {
        name: validator_name(&ty),
        max_length: None,
    });

    DataProperty {
        name: field.name.camel_case(),
        data_type: data_type(&ty),
        is_part_of_key: field.primary_key.then_some(true),
        is_nullable: field.nullable.then_some(true),
        default_value,
        max_length: field.max_length(),
        validators,
    }
}

fn navigation_property(schema: &Schema, model: &Model, field: &Field) -> Option<NavigationProperty> {
    let (target, is_scalar, pair) = match &field.ty {
        FieldTy::Primitive(_) => return None,
        FieldTy::BelongsTo(belongs_to) => {
            let navigation = NavigationProperty {
                name: field.name.camel_case(),
                entity_type_name: schema.model(belongs_to.target).wire_name(),
                is_scalar: true,
                association_name: association_name(schema, field.id),
                foreign_key_names: Some(foreign_key_names(schema, belongs_to)),
                inv_foreign_key_names: None,
            };
            return Some(navigation);
        }
        FieldTy::HasMany(has_many) => (has_many.target, false, has_many.pair),
        FieldTy::HasOne(has_one) => (has_one.target, true, has_one.pair),
    };

    let belongs_to = schema.field(pair).ty.as_belongs_to()?;
    debug_assert_eq!(belongs_to.target, model.id);

    Some(NavigationProperty {
        name: field.name.camel_case(),
        entity_type_name: schema.model(target).wire_name(),
        is_scalar,
        association_name: association_name(schema, pair),
        foreign_key_names: None,
        inv_foreign_key_names: Some(foreign_key_names(schema, belongs_to)),
    })
}

/// Named after the dependent type and its `BelongsTo` field, e.g. `Post_Blog`.
fn association_name(schema: &Schema, belongs_to: FieldId) -> String {
    let dependent = schema.model(belongs_to.model);
    let field = schema.field(belongs_to);
    format!(
        "{}_{}",
        dependent.name.upper_camel_case(),
        gust_core::schema::Name::new(&field.name.app_name).upper_camel_case()
    )
}

fn foreign_key_names(schema: &Schema, belongs_to: &BelongsTo) -> Vec<String> {
    belongs_to
        .foreign_key
        .fields
        .iter()
        .map(|fk_field| fk_field.source(schema).name.camel_case())
        .collect()
}

fn data_type(ty: &Type) -> &'static str {
    match ty {
        Type::Bool => "Boolean",
        Type::I16 => "Int16",
        Type::I32 => "Int32",
        Type::I64 => "Int64",
        Type::F64 => "Double",
        Type::String => "String",
        Type::Uuid => "Guid",
        Type::Timestamp => "DateTime",
    }
}

fn validator_name(ty: &Type) -> &'static str {
    match ty {
        Type::Bool => "bool",
        Type::I16 => "int16",
        Type::I32 => "int32",
        Type::I64 => "int64",
        Type::F64 => "number",
        Type::String => "string",
        Type::Uuid => "guid",
        Type::Timestamp => "date",
    }
}
