//! Test fixtures and workspace helpers.
//!
//! Provides feature builders, a sample network and temporary directories
//! laid out the way the import pipeline expects them.

use netshape_core::{Feature, Geometry, Position};
use netshape_gis::{sidecar_path, Layer, MemoryDriver};
use netshape_remote::MemoryRemote;
use serde_json::{json, Value as Json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Attribute names known to [`seeded_remote`].
pub const SEEDED_ATTRIBUTES: &[&str] = &["depth", "width"];

/// WKT of ETRS89 / UTM zone 32N, carrying its authority clause.
pub const UTM32_WKT: &str = r#"PROJCS["ETRS89 / UTM zone 32N",GEOGCS["ETRS89",DATUM["European_Terrestrial_Reference_System_1989",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],UNIT["metre",1],AUTHORITY["EPSG","25832"]]"#;

/// A point feature.
pub fn point(x: f64, y: f64) -> Feature {
    Feature::new(Geometry::Point([x, y]))
}

/// A line feature through `coords`.
pub fn line(coords: &[Position]) -> Feature {
    Feature::new(Geometry::LineString(coords.to_vec()))
}

/// Three canal reaches meeting at a junction at (10, 10).
///
/// The first carries a name and both seeded attributes, the others only
/// a depth. One endpoint value is a variable placeholder.
pub fn sample_links() -> Vec<Feature> {
    vec![
        line(&[[0.0, 0.0], [5.0, 4.0], [10.0, 10.0]])
            .with_property("name", "Upper reach")
            .with_property("depth", 2.5)
            .with_property("width", 12.0),
        line(&[[10.0, 10.0], [20.0, 10.0]]).with_property("depth", 1.5),
        line(&[[10.0, 10.0], [10.0, 25.0]]).with_property("depth", Json::Null),
    ]
}

/// Point features at every endpoint of [`sample_links`].
pub fn sample_nodes() -> Vec<Feature> {
    vec![
        point(0.0, 0.0).with_property("name", "Weir"),
        point(10.0, 10.0).with_property("name", "Junction"),
        point(20.0, 10.0).with_property("name", "East lock"),
        point(10.0, 25.0),
    ]
}

/// Serializes features as a GeoJSON feature collection.
///
/// A named CRS member is written when `epsg` is set.
pub fn feature_collection(name: &str, epsg: Option<u32>, features: &[Feature]) -> Json {
    let mut collection = json!({
        "type": "FeatureCollection",
        "name": name,
        "features": features,
    });
    if let Some(code) = epsg {
        collection["crs"] = json!({
            "type": "name",
            "properties": { "name": format!("urn:ogc:def:crs:EPSG::{code}") },
        });
    }
    collection
}

/// A temporary directory with automatic cleanup.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Creates a new temporary directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of an entry inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `<name>.geojson` and returns its path.
    pub fn write_layer(&self, name: &str, epsg: Option<u32>, features: &[Feature]) -> PathBuf {
        let path = self.join(&format!("{name}.geojson"));
        let text = serde_json::to_string_pretty(&feature_collection(name, epsg, features))
            .expect("Failed to serialize layer");
        fs::write(&path, text).expect("Failed to write layer");
        path
    }

    /// Writes a `.prj` sidecar next to `layer`.
    pub fn write_prj(&self, layer: &Path, wkt: &str) {
        fs::write(sidecar_path(layer, "prj"), wkt).expect("Failed to write sidecar");
    }

    /// Reads a written GeoJSON file.
    pub fn read_json(&self, path: &Path) -> Json {
        let text = fs::read_to_string(path).expect("Failed to read file");
        serde_json::from_str(&text).expect("Failed to parse file")
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-memory remote that knows [`SEEDED_ATTRIBUTES`].
pub fn seeded_remote() -> MemoryRemote {
    MemoryRemote::with_attributes(SEEDED_ATTRIBUTES.iter().copied())
        .expect("Failed to seed remote")
}

/// A memory driver holding the sample layers at `nodes.geojson` and
/// `links.geojson`.
pub fn sample_driver(epsg: Option<u32>) -> MemoryDriver {
    let driver = MemoryDriver::new();
    driver.insert("nodes.geojson", Layer::new("nodes", epsg, sample_nodes()));
    driver.insert("links.geojson", Layer::new("links", epsg, sample_links()));
    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use netshape_gis::LayerDriver;

    #[test]
    fn sample_nodes_cover_link_endpoints() {
        let nodes: Vec<Position> = sample_nodes()
            .iter()
            .filter_map(|f| match f.geometry {
                Geometry::Point(p) => Some(p),
                _ => None,
            })
            .collect();
        for link in sample_links() {
            let (a, b) = link.geometry.endpoints().unwrap();
            assert!(nodes.contains(&a));
            assert!(nodes.contains(&b));
        }
    }

    #[test]
    fn written_layer_is_readable() {
        let dir = TestDir::new();
        let path = dir.write_layer("canals", Some(2056), &sample_links());
        let source = netshape_gis::GeoJsonDriver::new().open(&path).unwrap();
        let layer = &source.layers()[0];
        assert_eq!(layer.epsg, Some(2056));
        assert_eq!(layer.feature_count(), 3);
    }

    #[test]
    fn sample_driver_holds_both_layers() {
        let driver = sample_driver(None);
        assert!(driver.exists(Path::new("nodes.geojson")));
        assert!(driver.exists(Path::new("links.geojson")));
    }
}
