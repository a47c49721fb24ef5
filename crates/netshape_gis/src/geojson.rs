//! GeoJSON layer driver.
//!
//! Each file holds one `FeatureCollection`. Besides the standard members the
//! driver writes a `crs` member naming the EPSG code and a `fields` member
//! declaring the field layout, so a written layer carries its full schema
//! even when every feature has a null for some field.

use crate::driver::{sidecar_path, LayerDriver, LayerWriter};
use crate::error::{GisError, GisResult};
use crate::layer::{DataSource, GeometryKind, Layer, LayerDefn};
use netshape_core::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const COLLECTION: &str = "FeatureCollection";
const EPSG_URN: &str = "urn:ogc:def:crs:EPSG::";

#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crs: Option<CrsMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldMember>,
    #[serde(default)]
    features: Vec<Json>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CrsMember {
    #[serde(rename = "type")]
    kind: String,
    properties: CrsProperties,
}

#[derive(Debug, Serialize, Deserialize)]
struct CrsProperties {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldMember {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
}

/// Parses the EPSG code out of a CRS name.
///
/// Accepts `urn:ogc:def:crs:EPSG::<code>`, `urn:ogc:def:crs:EPSG:<version>:<code>`,
/// `EPSG:<code>` and the CRS84 alias of 4326.
#[must_use]
pub fn parse_crs_name(name: &str) -> Option<u32> {
    let upper = name.trim().to_ascii_uppercase();
    if upper.ends_with("CRS84") {
        return Some(4326);
    }
    let (_, code) = upper.split_once("EPSG:")?;
    code.rsplit(':').next()?.trim().parse().ok()
}

/// A driver for GeoJSON files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoJsonDriver;

impl GeoJsonDriver {
    /// Creates the driver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse(path: &Path, text: &str) -> GisResult<Layer> {
        let file: CollectionFile = serde_json::from_str(text)
            .map_err(|e| GisError::unreadable(path, e.to_string()))?;
        if file.kind != COLLECTION {
            return Err(GisError::unreadable(
                path,
                format!("expected {COLLECTION}, found {}", file.kind),
            ));
        }
        let features = file
            .features
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<Feature>(value)
                    .map_err(|e| GisError::unreadable(path, format!("feature {index}: {e}")))
            })
            .collect::<GisResult<Vec<_>>>()?;
        let name = file.name.unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let epsg = file.crs.and_then(|c| parse_crs_name(&c.properties.name));
        Ok(Layer::new(name, epsg, features))
    }
}

impl LayerDriver for GeoJsonDriver {
    fn name(&self) -> &str {
        "geojson"
    }

    fn extension(&self) -> &str {
        "geojson"
    }

    fn open(&self, path: &Path) -> GisResult<DataSource> {
        let text =
            fs::read_to_string(path).map_err(|e| GisError::unreadable(path, e.to_string()))?;
        let layer = Self::parse(path, &text)?;
        debug!(path = %path.display(), features = layer.feature_count(), "read layer");
        Ok(DataSource::new(path, vec![layer]))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn delete(&self, path: &Path) -> GisResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn create_dir(&self, dir: &Path) -> GisResult<()> {
        fs::create_dir_all(dir)?;
        Ok(())
    }

    fn create<'a>(
        &'a self,
        path: &Path,
        defn: LayerDefn,
    ) -> GisResult<Box<dyn LayerWriter + 'a>> {
        if path.exists() {
            return Err(GisError::OutputExists {
                path: path.to_path_buf(),
            });
        }
        Ok(Box::new(GeoJsonWriter {
            path: path.to_path_buf(),
            defn,
            features: Vec::new(),
        }))
    }

    fn read_sidecar(&self, path: &Path, extension: &str) -> GisResult<Option<String>> {
        match fs::read_to_string(sidecar_path(path, extension)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

struct GeoJsonWriter {
    path: PathBuf,
    defn: LayerDefn,
    features: Vec<Json>,
}

impl GeoJsonWriter {
    fn collection(self) -> CollectionFile {
        let geometry_kind = match self.defn.geometry_kind {
            GeometryKind::Point => "Point",
            GeometryKind::Line => "LineString",
        };
        CollectionFile {
            kind: COLLECTION.to_string(),
            name: Some(self.defn.name),
            crs: Some(CrsMember {
                kind: "name".to_string(),
                properties: CrsProperties {
                    name: format!("{EPSG_URN}{}", self.defn.epsg),
                },
            }),
            geometry_kind: Some(geometry_kind.to_string()),
            fields: self
                .defn
                .fields
                .into_iter()
                .map(|f| FieldMember {
                    name: f.short_name,
                    field_type: f.field_type.as_str().to_string(),
                })
                .collect(),
            features: self.features,
        }
    }
}

impl LayerWriter for GeoJsonWriter {
    fn write(&mut self, feature: Feature) -> GisResult<()> {
        self.features.push(serde_json::to_value(feature)?);
        Ok(())
    }

    fn finish(self: Box<Self>) -> GisResult<usize> {
        let writer = *self;
        let path = writer.path.clone();
        let count = writer.features.len();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => GisError::OutputExists { path: path.clone() },
                _ => GisError::Io(e),
            })?;

        let mut out = BufWriter::new(file);
        let result = serde_json::to_writer_pretty(&mut out, &writer.collection())
            .map_err(GisError::from)
            .and_then(|()| out.flush().map_err(GisError::from));
        if let Err(e) = result {
            drop(out);
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        Ok(count)
    }
}
