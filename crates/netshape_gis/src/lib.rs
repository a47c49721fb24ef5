//! # netshape gis
//!
//! Geometry layer drivers and projection lookup for netshape.
//!
//! Drivers are the low-level reader/writer seam: they read whole data sources
//! into [`Layer`]s and write one layer per file. They know nothing about
//! networks or schemas beyond the field list they are handed.
//!
//! ## Available Drivers
//!
//! - [`MemoryDriver`] - For testing
//! - [`GeoJsonDriver`] - GeoJSON files on disk
//!
//! ## Projection Lookup
//!
//! [`ProjectionLookup`] turns a `.prj` sidecar into EPSG codes.
//! [`WktAuthorityLookup`] is an offline implementation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod error;
mod geojson;
mod layer;
mod memory;
mod projection;

pub use driver::{sidecar_path, LayerDriver, LayerWriter};
pub use error::{GisError, GisResult};
pub use geojson::{parse_crs_name, GeoJsonDriver};
pub use layer::{DataSource, GeometryKind, Layer, LayerDefn};
pub use memory::MemoryDriver;
pub use projection::{ProjectionLookup, ProjectionMatch, WktAuthorityLookup};
