//! Remote client abstraction.

use crate::error::RemoteResult;
use crate::payload::{AttrPayload, NetworkBrief, NetworkPayload, NetworkSummary, Project};
use netshape_core::{NetworkId, ProjectId};

/// A connection to the remote network model service.
///
/// This trait abstracts authentication, sessions and the wire protocol. Each
/// method corresponds to one remote call.
///
/// # Implementors
///
/// - [`crate::MemoryRemote`] - For testing
/// - [`crate::FileRemote`] - A local JSON store file
pub trait RemoteClient: Send + Sync {
    /// Lists every attribute definition.
    fn get_all_attributes(&self) -> RemoteResult<Vec<AttrPayload>>;

    /// Creates an attribute definition and returns it with its identity.
    ///
    /// If a definition with the same name and dimension exists, it is
    /// returned unchanged.
    fn add_attribute(&self, attr: &AttrPayload) -> RemoteResult<AttrPayload>;

    /// Fetches a network. Without `include_data` the scenarios carry no
    /// values.
    fn get_network(&self, network_id: NetworkId, include_data: bool)
        -> RemoteResult<NetworkPayload>;

    /// Fetches the project owning a network.
    fn get_network_project(&self, network_id: NetworkId) -> RemoteResult<Project>;

    /// Fetches a project.
    fn get_project(&self, project_id: ProjectId) -> RemoteResult<Project>;

    /// Creates a project and returns it with its identity.
    fn add_project(&self, project: &Project) -> RemoteResult<Project>;

    /// Stores a new network. Placeholder identities in the payload are
    /// replaced by permanent ones.
    fn add_network(&self, network: &NetworkPayload) -> RemoteResult<NetworkSummary>;

    /// Lists every project.
    fn get_projects(&self) -> RemoteResult<Vec<Project>>;

    /// Lists the networks of a project.
    fn get_networks(&self, project_id: ProjectId) -> RemoteResult<Vec<NetworkBrief>>;
}
