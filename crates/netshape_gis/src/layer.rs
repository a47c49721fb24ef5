//! Layers and data sources.

use netshape_core::{Feature, FieldDefn};
use std::path::{Path, PathBuf};

/// Geometry kind declared for an output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Point features.
    Point,
    /// Line features.
    Line,
}

/// A layer read from a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// EPSG code embedded in the layer, if any.
    pub epsg: Option<u32>,
    /// Features in file order.
    pub features: Vec<Feature>,
}

impl Layer {
    /// Creates a layer.
    pub fn new(name: impl Into<String>, epsg: Option<u32>, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            epsg,
            features,
        }
    }

    /// Number of features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// Declaration of a layer about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDefn {
    /// Layer name.
    pub name: String,
    /// EPSG code of the layer's coordinate reference system.
    pub epsg: u32,
    /// Geometry kind of every feature.
    pub geometry_kind: GeometryKind,
    /// Field layout shared by every feature.
    pub fields: Vec<FieldDefn>,
}

/// All layers of one opened data source.
///
/// Drivers read the source completely before returning it, so no native
/// handle outlives [`crate::LayerDriver::open`].
#[derive(Debug, Clone)]
pub struct DataSource {
    path: PathBuf,
    layers: Vec<Layer>,
}

impl DataSource {
    /// Creates a data source.
    pub fn new(path: impl Into<PathBuf>, layers: Vec<Layer>) -> Self {
        Self {
            path: path.into(),
            layers,
        }
    }

    /// Path the source was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layers in source order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Consumes the source, yielding its layers.
    #[must_use]
    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}
