//! # netshape core
//!
//! In-memory model of a spatial network and the reconciliation logic that
//! moves it between a graph-shaped remote data model and geometry layers.
//!
//! This crate provides:
//! - Placeholder identity allocation for unpersisted entities
//! - The [`Network`] graph with case-insensitive name disambiguation
//! - A coordinate index for node deduplication
//! - The [`Reconciler`], which turns point and line features into nodes and links
//! - Export schema inference, one field layout per entity class
//!
//! ## Example
//!
//! ```rust
//! use netshape_core::{Feature, Geometry, Network, NodeMode, Reconciler};
//!
//! let mut network = Network::new("canals");
//! let mut reconciler = Reconciler::new(&mut network, NodeMode::Create);
//! let a = Feature::new(Geometry::LineString(vec![[0.0, 0.0], [1.0, 0.0]]));
//! let b = Feature::new(Geometry::LineString(vec![[1.0, 0.0], [1.0, 1.0]]));
//! reconciler.add_link_feature(&a).unwrap();
//! reconciler.add_link_feature(&b).unwrap();
//!
//! assert_eq!(network.node_count(), 3);
//! assert_eq!(network.link_count(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod coord;
mod entity;
mod error;
mod feature;
mod ids;
mod network;
mod reconcile;
pub mod schema;
mod types;
mod value;

pub use catalog::{AttrDef, AttributeCatalog};
pub use config::{MatchPolicy, SchemaConfig};
pub use coord::{round_to, CoordKey, CoordinateIndex};
pub use entity::{HasAttributes, Link, Node, Resource, TypeTag};
pub use error::{CoreError, CoreResult};
pub use feature::{Feature, Geometry, Position};
pub use ids::{IdAllocator, PlaceholderSequence};
pub use network::Network;
pub use reconcile::{match_coordinate, CoordMatch, NodeMode, Reconciler};
pub use schema::{EntityClass, FieldDefn, FieldType, LayerSchema};
pub use types::{AttrId, LinkId, NetworkId, NodeId, ProjectId, ResourceAttrId, ScenarioId};
pub use value::{AttrKind, AttrValue, Attribute};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
