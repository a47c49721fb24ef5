//! Geometry features exchanged with layer drivers.
//!
//! A feature is a geometry plus a flat property table. The serde form is
//! GeoJSON, which is also what link layouts store as their geometry override.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json};

/// A planar position (x, y). Extra ordinates are dropped on read.
pub type Position = [f64; 2];

/// Feature geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry", into = "RawGeometry")]
pub enum Geometry {
    /// A single point.
    Point(Position),
    /// A path.
    LineString(Vec<Position>),
    /// Several paths.
    MultiLineString(Vec<Vec<Position>>),
    /// Any geometry type not modelled above, kept verbatim.
    Other {
        /// GeoJSON type name.
        type_name: String,
        /// Raw coordinates.
        coordinates: Json,
    },
}

#[derive(Serialize, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    coordinates: Json,
}

fn position(value: &Json) -> Result<Position, String> {
    let ords: Vec<f64> = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
    match ords.as_slice() {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(format!("position needs two ordinates, got {}", ords.len())),
    }
}

fn path(value: &Json) -> Result<Vec<Position>, String> {
    value
        .as_array()
        .ok_or_else(|| "path must be an array of positions".to_string())?
        .iter()
        .map(position)
        .collect()
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = String;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        match raw.type_name.as_str() {
            "Point" => Ok(Self::Point(position(&raw.coordinates)?)),
            "LineString" => Ok(Self::LineString(path(&raw.coordinates)?)),
            "MultiLineString" => Ok(Self::MultiLineString(
                raw.coordinates
                    .as_array()
                    .ok_or_else(|| "MultiLineString needs an array of paths".to_string())?
                    .iter()
                    .map(path)
                    .collect::<Result<_, _>>()?,
            )),
            _ => Ok(Self::Other {
                type_name: raw.type_name,
                coordinates: raw.coordinates,
            }),
        }
    }
}

impl From<Geometry> for RawGeometry {
    fn from(geometry: Geometry) -> Self {
        let type_name = geometry.type_name().to_string();
        let coordinates = match geometry {
            Geometry::Point(p) => Json::from(p.to_vec()),
            Geometry::LineString(ps) => Json::from(ps.iter().map(|p| p.to_vec()).collect::<Vec<_>>()),
            Geometry::MultiLineString(parts) => Json::from(
                parts
                    .iter()
                    .map(|ps| ps.iter().map(|p| p.to_vec()).collect::<Vec<_>>())
                    .collect::<Vec<_>>(),
            ),
            Geometry::Other { coordinates, .. } => coordinates,
        };
        Self {
            type_name,
            coordinates,
        }
    }
}

impl Geometry {
    /// GeoJSON type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::MultiLineString(_) => "MultiLineString",
            Self::Other { type_name, .. } => type_name,
        }
    }

    /// Straight segment between two positions.
    #[must_use]
    pub fn segment(from: Position, to: Position) -> Self {
        Self::LineString(vec![from, to])
    }

    /// Total number of vertices of a line geometry; `None` for other types.
    #[must_use]
    pub fn vertex_count(&self) -> Option<usize> {
        match self {
            Self::LineString(ps) => Some(ps.len()),
            Self::MultiLineString(parts) => Some(parts.iter().map(Vec::len).sum()),
            _ => None,
        }
    }

    /// First and last vertex of a line geometry.
    ///
    /// For multi-part lines these are the first vertex of the first non-empty
    /// part and the last vertex of the last non-empty part.
    #[must_use]
    pub fn endpoints(&self) -> Option<(Position, Position)> {
        match self {
            Self::LineString(ps) => Some((*ps.first()?, *ps.last()?)),
            Self::MultiLineString(parts) => {
                let first = parts.iter().find_map(|p| p.first())?;
                let last = parts.iter().rev().find_map(|p| p.last())?;
                Some((*first, *last))
            }
            _ => None,
        }
    }

    /// GeoJSON value of this geometry.
    #[must_use]
    pub fn to_json(&self) -> Json {
        let raw = RawGeometry::from(self.clone());
        serde_json::json!({ "type": raw.type_name, "coordinates": raw.coordinates })
    }

    /// Parses a GeoJSON geometry value.
    #[must_use]
    pub fn from_json(value: &Json) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// A geometry with its property table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// Feature geometry.
    pub geometry: Geometry,
    /// Non-geometry properties.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Json>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Json>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Json>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    /// Creates a feature without properties.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: Map::new(),
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// True when `key` names the display-name property.
    #[must_use]
    pub fn is_name_key(key: &str) -> bool {
        key.eq_ignore_ascii_case("name")
    }
}
