//! Export schema inference.
//!
//! Output layers need one fixed field list, but entities of a class may carry
//! different attribute sets. Entities are first partitioned by their joined
//! type tags; each class then gets one field per attribute name, typed from
//! the values observed across all members. Conflicting types fail the export
//! instead of being widened.

use crate::config::SchemaConfig;
use crate::entity::{HasAttributes, Resource, TypeTag};
use crate::error::{CoreError, CoreResult};
use crate::value::{AttrKind, AttrValue};
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

/// Output field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Floating point number.
    Real,
    /// Text.
    Text,
}

impl FieldType {
    /// Field type used for values of `kind`.
    #[must_use]
    pub const fn of(kind: AttrKind) -> Self {
        match kind {
            AttrKind::Scalar => Self::Real,
            AttrKind::Descriptor | AttrKind::Array | AttrKind::Timeseries | AttrKind::Unknown => {
                Self::Text
            }
        }
    }

    /// Name used in layer field declarations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "Real",
            Self::Text => "String",
        }
    }
}

/// One output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefn {
    /// Attribute name.
    pub name: String,
    /// Identifier in the output format, truncated to the length limit.
    pub short_name: String,
    /// Field type.
    pub field_type: FieldType,
}

/// Field layout of one output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSchema {
    /// Class label.
    pub label: String,
    /// Fields, starting with the synthetic `name` field.
    pub fields: Vec<FieldDefn>,
}

impl LayerSchema {
    /// Looks a field up by attribute name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefn> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Entities sharing one class label.
#[derive(Debug)]
pub struct EntityClass<'a, E> {
    /// Joined type names, or the generic label.
    pub label: String,
    /// Members in input order.
    pub members: Vec<&'a E>,
}

/// Name of the field every layer carries for the display name.
pub const NAME_FIELD: &str = "name";

/// Class label for a set of type tags.
#[must_use]
pub fn class_label(types: &[TypeTag], generic: &str) -> String {
    let joined = types
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join("_");
    if joined.is_empty() {
        generic.to_string()
    } else {
        joined
    }
}

/// Groups entities by class label, in order of first appearance.
pub fn partition<'a, E, I>(entities: I, generic: &str) -> Vec<EntityClass<'a, E>>
where
    E: Resource + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut classes: Vec<EntityClass<'a, E>> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for entity in entities {
        let label = class_label(entity.types(), generic);
        match slots.get(&label) {
            Some(&slot) => classes[slot].members.push(entity),
            None => {
                slots.insert(label.clone(), classes.len());
                classes.push(EntityClass {
                    label,
                    members: vec![entity],
                });
            }
        }
    }
    classes
}

fn truncate(name: &str, limit: usize) -> String {
    name.chars().take(limit).collect()
}

/// Infers the field layout of a class.
///
/// # Errors
///
/// - [`CoreError::AmbiguousSchema`] if one attribute name is observed with
///   values of two field types.
/// - [`CoreError::FieldNameCollision`] if two fields truncate to the same
///   identifier.
pub fn resolve_schema<E: Resource>(
    class: &EntityClass<'_, E>,
    config: &SchemaConfig,
) -> CoreResult<LayerSchema> {
    // attribute name -> observed field type (None until a value is seen)
    let mut order: Vec<&str> = Vec::new();
    let mut observed: HashMap<&str, Option<FieldType>> = HashMap::new();

    for entity in &class.members {
        for attribute in entity.iter_attributes() {
            let seen = observed.entry(attribute.name.as_str()).or_insert_with(|| {
                order.push(attribute.name.as_str());
                None
            });
            let Some(kind) = attribute.kind() else {
                continue;
            };
            let field_type = FieldType::of(kind);
            if let Some(existing) = *seen {
                if existing != field_type {
                    return Err(CoreError::ambiguous_schema(&class.label, &attribute.name));
                }
            }
            *seen = Some(field_type);
        }
    }

    let mut fields = vec![FieldDefn {
        name: NAME_FIELD.to_string(),
        short_name: truncate(NAME_FIELD, config.field_name_limit),
        field_type: FieldType::Text,
    }];
    for name in order {
        let field_type = observed.get(name).copied().flatten().unwrap_or(FieldType::Text);
        let short_name = truncate(name, config.field_name_limit);
        if let Some(clash) = fields.iter().find(|f| f.short_name == short_name) {
            return Err(CoreError::FieldNameCollision {
                class: class.label.clone(),
                first: clash.name.clone(),
                second: name.to_string(),
                short_name,
            });
        }
        fields.push(FieldDefn {
            name: name.to_string(),
            short_name,
            field_type,
        });
    }

    Ok(LayerSchema {
        label: class.label.clone(),
        fields,
    })
}

/// Output value for an attribute.
///
/// Arrays and timeseries are written as fixed placeholder strings; variable
/// attributes and non-finite numbers become null.
#[must_use]
pub fn export_value(value: Option<&AttrValue>) -> Json {
    match value {
        None => Json::Null,
        Some(AttrValue::Scalar(v)) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Some(AttrValue::Descriptor(s)) => Json::String(s.clone()),
        Some(AttrValue::Array(_)) => Json::String("Array".to_string()),
        Some(AttrValue::Timeseries(_)) => Json::String("Timeseries".to_string()),
        Some(AttrValue::Unknown { raw, .. }) => Json::String(raw.clone()),
    }
}

/// Property table of one entity under `schema`, keyed by short field name.
///
/// Every schema field is present; attributes the entity lacks are null.
#[must_use]
pub fn feature_properties<E: Resource>(entity: &E, schema: &LayerSchema) -> Map<String, Json> {
    schema
        .fields
        .iter()
        .map(|field| {
            let value = if field.name == NAME_FIELD {
                Json::String(entity.name().to_string())
            } else {
                export_value(
                    entity
                        .attribute(&field.name)
                        .and_then(|a| a.value.as_ref()),
                )
            };
            (field.short_name.clone(), value)
        })
        .collect()
}
