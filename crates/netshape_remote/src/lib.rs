//! # netshape remote
//!
//! Client side of the remote network model service.
//!
//! The service stores projects, networks, scenarios, nodes, links and
//! attribute values. This crate defines the messages exchanged with it
//! ([`payload`]) and the [`RemoteClient`] trait the orchestrator talks to.
//! Authentication and the wire protocol live behind the trait.
//!
//! ## Available Clients
//!
//! - [`MemoryRemote`] - For testing
//! - [`FileRemote`] - A local JSON store file

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod file;
mod memory;
pub mod payload;
mod store;

pub use client::RemoteClient;
pub use error::{RemoteError, RemoteResult};
pub use file::FileRemote;
pub use memory::MemoryRemote;
pub use payload::{
    format_coordinate, AttrPayload, Dataset, Flag, LinkPayload, NetworkBrief, NetworkPayload,
    NetworkSummary, NodePayload, Project, ResourceAttrPayload, ResourceScenario, ScenarioBrief,
    ScenarioPayload,
};
