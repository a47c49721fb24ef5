//! Attribute values.
//!
//! Values carry their kind from the moment they are created, either from a
//! remote dataset (which names its type) or from a feature property (whose
//! JSON type decides). Nothing downstream inspects the payload to guess.

use crate::error::{CoreError, CoreResult};
use crate::types::AttrId;
use serde_json::Value as Json;
use std::fmt;

/// Kind of a stored attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// A single number.
    Scalar,
    /// Free text.
    Descriptor,
    /// A time-indexed series.
    Timeseries,
    /// A (possibly nested) array.
    Array,
    /// A dataset type this tool does not understand.
    Unknown,
}

impl AttrKind {
    /// Dataset type name used by the remote data model.
    #[must_use]
    pub const fn dataset_type(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Descriptor => "descriptor",
            Self::Timeseries => "timeseries",
            Self::Array => "array",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset_type())
    }
}

/// An attribute value tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A number.
    Scalar(f64),
    /// Text.
    Descriptor(String),
    /// Serialized array data, kept verbatim.
    Array(String),
    /// Serialized timeseries data, kept verbatim.
    Timeseries(String),
    /// Data of a type outside the ones above.
    Unknown {
        /// Dataset type name as reported by the source.
        type_name: String,
        /// Raw serialized value.
        raw: String,
    },
}

impl AttrValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> AttrKind {
        match self {
            Self::Scalar(_) => AttrKind::Scalar,
            Self::Descriptor(_) => AttrKind::Descriptor,
            Self::Array(_) => AttrKind::Array,
            Self::Timeseries(_) => AttrKind::Timeseries,
            Self::Unknown { .. } => AttrKind::Unknown,
        }
    }

    /// Builds a value from a remote dataset's type name and serialized value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPayload`] if a scalar dataset does not
    /// hold a number.
    pub fn from_dataset(type_name: &str, raw: &str) -> CoreResult<Self> {
        Ok(match type_name.to_ascii_lowercase().as_str() {
            "scalar" => {
                let number = raw.trim().parse::<f64>().map_err(|_| {
                    CoreError::invalid_payload(format!("scalar dataset value '{raw}' is not a number"))
                })?;
                Self::Scalar(number)
            }
            "descriptor" => Self::Descriptor(raw.to_string()),
            "array" => Self::Array(raw.to_string()),
            "timeseries" => Self::Timeseries(raw.to_string()),
            _ => Self::Unknown {
                type_name: type_name.to_string(),
                raw: raw.to_string(),
            },
        })
    }

    /// Builds a value from a feature property.
    ///
    /// `null` yields `None`, which callers store as a variable placeholder.
    #[must_use]
    pub fn from_property(value: &Json) -> Option<Self> {
        match value {
            Json::Null => None,
            Json::Bool(b) => Some(Self::Scalar(if *b { 1.0 } else { 0.0 })),
            Json::Number(n) => n.as_f64().map(Self::Scalar),
            Json::String(s) => Some(Self::Descriptor(s.clone())),
            Json::Array(_) | Json::Object(_) => Some(Self::Descriptor(value.to_string())),
        }
    }

    /// Dataset type name for persisting this value.
    #[must_use]
    pub fn dataset_type(&self) -> &str {
        match self {
            Self::Unknown { type_name, .. } => type_name,
            other => other.kind().dataset_type(),
        }
    }

    /// Serialized form for a remote dataset.
    #[must_use]
    pub fn dataset_value(&self) -> String {
        match self {
            Self::Scalar(v) => v.to_string(),
            Self::Descriptor(s) | Self::Array(s) | Self::Timeseries(s) => s.clone(),
            Self::Unknown { raw, .. } => raw.clone(),
        }
    }
}

/// An attribute bound to a node or link.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name, shared through the catalog.
    pub name: String,
    /// Catalog identity, once known.
    pub attr_id: Option<AttrId>,
    /// Stored value; `None` marks a variable placeholder without data.
    pub value: Option<AttrValue>,
}

impl Attribute {
    /// Creates an attribute that is not yet bound to a catalog entry.
    pub fn new(name: impl Into<String>, value: Option<AttrValue>) -> Self {
        Self {
            name: name.into(),
            attr_id: None,
            value,
        }
    }

    /// Sets the catalog identity.
    #[must_use]
    pub fn with_attr_id(mut self, attr_id: AttrId) -> Self {
        self.attr_id = Some(attr_id);
        self
    }

    /// True when the attribute holds no data.
    #[must_use]
    pub fn is_var(&self) -> bool {
        self.value.is_none()
    }

    /// Kind of the stored value, if any.
    #[must_use]
    pub fn kind(&self) -> Option<AttrKind> {
        self.value.as_ref().map(AttrValue::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dataset_kinds() {
        assert_eq!(
            AttrValue::from_dataset("scalar", "3.5").unwrap(),
            AttrValue::Scalar(3.5)
        );
        assert_eq!(
            AttrValue::from_dataset("descriptor", "deep").unwrap().kind(),
            AttrKind::Descriptor
        );
        assert_eq!(
            AttrValue::from_dataset("array", "[1, 2]").unwrap().kind(),
            AttrKind::Array
        );
        assert_eq!(
            AttrValue::from_dataset("timeseries", "{}").unwrap().kind(),
            AttrKind::Timeseries
        );
        assert_eq!(
            AttrValue::from_dataset("eqtimeseries", "x").unwrap().kind(),
            AttrKind::Unknown
        );
    }

    #[test]
    fn bad_scalar_is_rejected() {
        let err = AttrValue::from_dataset("scalar", "deep").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload { .. }));
    }

    #[test]
    fn property_kinds() {
        assert_eq!(AttrValue::from_property(&json!(null)), None);
        assert_eq!(
            AttrValue::from_property(&json!(2)),
            Some(AttrValue::Scalar(2.0))
        );
        assert_eq!(
            AttrValue::from_property(&json!(true)),
            Some(AttrValue::Scalar(1.0))
        );
        assert_eq!(
            AttrValue::from_property(&json!("river")),
            Some(AttrValue::Descriptor("river".into()))
        );
    }

    #[test]
    fn unknown_keeps_source_type_name() {
        let value = AttrValue::from_dataset("eqtimeseries", "raw").unwrap();
        assert_eq!(value.dataset_type(), "eqtimeseries");
        assert_eq!(value.dataset_value(), "raw");
    }

    #[test]
    fn scalar_dataset_value_round_trips() {
        let value = AttrValue::Scalar(0.1 + 0.2);
        let back = AttrValue::from_dataset("scalar", &value.dataset_value()).unwrap();
        assert_eq!(back, value);
    }
}
