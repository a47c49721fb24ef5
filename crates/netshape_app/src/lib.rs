//! # netshape app
//!
//! Import and export orchestration between a remote network model and
//! geometry layer files.
//!
//! This crate provides:
//! - [`Importer`]: node and link layers to a saved remote network
//! - [`Exporter`]: a loaded network to one layer per entity class
//! - [`NetworkSession`]: catalog, load and save against a [`RemoteClient`]
//! - [`ProjectTree`]: listing of projects, networks and scenarios
//!
//! ## Pipeline
//!
//! Import runs strictly in order:
//! 1. Fetch the attribute catalog
//! 2. Read node layers, then link layers
//! 3. Resolve the coordinate reference system from the first layer that has one
//! 4. Create the project and missing attribute definitions
//! 5. Save the network with one default scenario
//!
//! Any failure stops the run. Nothing is saved unless every source was
//! reconciled.
//!
//! [`RemoteClient`]: netshape_remote::RemoteClient

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod exporter;
mod importer;
mod options;
mod session;
mod tree;

pub use error::{AppError, AppResult};
pub use exporter::{ExportReport, Exporter, LayerReport};
pub use importer::{ImportReport, Importer};
pub use options::{ExportOptions, ImportOptions};
pub use session::{NetworkSession, SaveNames, SCENARIO_NAME};
pub use tree::{ProjectEntry, ProjectTree};
