//! In-memory layer driver for testing.

use crate::driver::{sidecar_path, LayerDriver, LayerWriter};
use crate::error::{GisError, GisResult};
use crate::layer::{DataSource, GeometryKind, Layer, LayerDefn};
use netshape_core::{Feature, FieldDefn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct StoredFile {
    layers: Vec<Layer>,
    fields: Vec<FieldDefn>,
    geometry_kind: Option<GeometryKind>,
}

/// A layer driver that keeps files in memory.
///
/// Paths are plain map keys; nothing touches the filesystem.
///
/// # Example
///
/// ```rust
/// use netshape_core::{Feature, Geometry};
/// use netshape_gis::{Layer, LayerDriver, MemoryDriver};
/// use std::path::Path;
///
/// let driver = MemoryDriver::new();
/// let point = Feature::new(Geometry::Point([1.0, 2.0]));
/// driver.insert("in/weirs.shp", Layer::new("weirs", Some(4326), vec![point]));
///
/// let source = driver.open(Path::new("in/weirs.shp")).unwrap();
/// assert_eq!(source.layers()[0].feature_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryDriver {
    files: RwLock<HashMap<PathBuf, StoredFile>>,
    sidecars: RwLock<HashMap<PathBuf, String>>,
}

impl MemoryDriver {
    /// Creates an empty driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a single-layer file at `path`, replacing any previous one.
    pub fn insert(&self, path: impl Into<PathBuf>, layer: Layer) {
        self.insert_layers(path, vec![layer]);
    }

    /// Stores a multi-layer file at `path`.
    pub fn insert_layers(&self, path: impl Into<PathBuf>, layers: Vec<Layer>) {
        self.files.write().insert(
            path.into(),
            StoredFile {
                layers,
                fields: Vec::new(),
                geometry_kind: None,
            },
        );
    }

    /// Stores a sidecar next to `path`.
    pub fn insert_sidecar(&self, path: &Path, extension: &str, contents: impl Into<String>) {
        self.sidecars
            .write()
            .insert(sidecar_path(path, extension), contents.into());
    }

    /// Field declarations of a file written through this driver.
    #[must_use]
    pub fn fields(&self, path: &Path) -> Option<Vec<FieldDefn>> {
        self.files.read().get(path).map(|f| f.fields.clone())
    }

    /// Declared geometry kind of a file written through this driver.
    #[must_use]
    pub fn geometry_kind(&self, path: &Path) -> Option<GeometryKind> {
        self.files.read().get(path).and_then(|f| f.geometry_kind)
    }

    /// Paths of all stored files, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl LayerDriver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn extension(&self) -> &str {
        "geojson"
    }

    fn open(&self, path: &Path) -> GisResult<DataSource> {
        let files = self.files.read();
        let file = files
            .get(path)
            .ok_or_else(|| GisError::unreadable(path, "no such file"))?;
        Ok(DataSource::new(path, file.layers.clone()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    fn delete(&self, path: &Path) -> GisResult<()> {
        self.files.write().remove(path);
        Ok(())
    }

    fn create_dir(&self, _dir: &Path) -> GisResult<()> {
        Ok(())
    }

    fn create<'a>(
        &'a self,
        path: &Path,
        defn: LayerDefn,
    ) -> GisResult<Box<dyn LayerWriter + 'a>> {
        if self.exists(path) {
            return Err(GisError::OutputExists {
                path: path.to_path_buf(),
            });
        }
        Ok(Box::new(MemoryWriter {
            driver: self,
            path: path.to_path_buf(),
            defn,
            features: Vec::new(),
        }))
    }

    fn read_sidecar(&self, path: &Path, extension: &str) -> GisResult<Option<String>> {
        Ok(self
            .sidecars
            .read()
            .get(&sidecar_path(path, extension))
            .cloned())
    }
}

struct MemoryWriter<'a> {
    driver: &'a MemoryDriver,
    path: PathBuf,
    defn: LayerDefn,
    features: Vec<Feature>,
}

impl LayerWriter for MemoryWriter<'_> {
    fn write(&mut self, feature: Feature) -> GisResult<()> {
        self.features.push(feature);
        Ok(())
    }

    fn finish(self: Box<Self>) -> GisResult<usize> {
        let writer = *self;
        let count = writer.features.len();
        let mut files = writer.driver.files.write();
        if files.contains_key(&writer.path) {
            return Err(GisError::OutputExists { path: writer.path });
        }
        let layer = Layer::new(writer.defn.name, Some(writer.defn.epsg), writer.features);
        files.insert(
            writer.path,
            StoredFile {
                layers: vec![layer],
                fields: writer.defn.fields,
                geometry_kind: Some(writer.defn.geometry_kind),
            },
        );
        Ok(count)
    }
}
