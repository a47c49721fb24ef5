//! Layer driver traits.

use crate::error::GisResult;
use crate::layer::{DataSource, LayerDefn};
use netshape_core::Feature;
use std::path::{Path, PathBuf};

/// Reads and writes geometry layer files.
///
/// Drivers own every byte-level detail of the file format. Callers only see
/// [`DataSource`]s on the way in and [`LayerWriter`]s on the way out.
///
/// # Invariants
///
/// - `open` reads the source completely; no handle outlives the call
/// - `create` never touches an existing file
/// - a writer produces output only when [`LayerWriter::finish`] succeeds
///
/// # Implementors
///
/// - [`crate::MemoryDriver`] - For testing
/// - [`crate::GeoJsonDriver`] - For files on disk
pub trait LayerDriver: Send + Sync {
    /// Short driver name, used in log output.
    fn name(&self) -> &str;

    /// File extension of layer files, without the dot.
    fn extension(&self) -> &str;

    /// Opens a data source and reads all of its layers.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GisError::SourceUnreadable`] if the path does not
    /// exist or cannot be parsed.
    fn open(&self, path: &Path) -> GisResult<DataSource>;

    /// True if a layer file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Deletes the layer file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn delete(&self, path: &Path) -> GisResult<()>;

    /// Makes sure the output directory `dir` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir(&self, dir: &Path) -> GisResult<()>;

    /// Starts writing a new single-layer file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GisError::OutputExists`] if a file is already present.
    fn create<'a>(&'a self, path: &Path, defn: LayerDefn)
        -> GisResult<Box<dyn LayerWriter + 'a>>;

    /// Reads the sidecar file next to `path` with the given extension, such
    /// as the `.prj` projection description.
    ///
    /// Returns `Ok(None)` if there is no sidecar.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar exists but cannot be read.
    fn read_sidecar(&self, path: &Path, extension: &str) -> GisResult<Option<String>>;
}

/// Accumulates the features of one output layer.
pub trait LayerWriter {
    /// Appends a feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature cannot be encoded.
    fn write(&mut self, feature: Feature) -> GisResult<()>;

    /// Commits the layer and returns the number of features written.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written. No partial file is
    /// left behind.
    fn finish(self: Box<Self>) -> GisResult<usize>;
}

/// Path of the sidecar file of `path` with the given extension.
#[must_use]
pub fn sidecar_path(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/data/rivers.shp"), "prj"),
            PathBuf::from("/data/rivers.prj")
        );
        assert_eq!(
            sidecar_path(Path::new("weirs"), "prj"),
            PathBuf::from("weirs.prj")
        );
    }
}
