//! In-memory remote for testing.

use crate::client::RemoteClient;
use crate::error::RemoteResult;
use crate::payload::{AttrPayload, NetworkBrief, NetworkPayload, NetworkSummary, Project};
use crate::store::StoreState;
use netshape_core::{NetworkId, ProjectId};
use parking_lot::RwLock;
use tracing::debug;

/// A remote that keeps everything in memory.
///
/// It validates requests the way the real service does: network saves are
/// rejected for unknown projects, unknown attributes, dangling link
/// endpoints and duplicate names.
///
/// # Example
///
/// ```rust
/// use netshape_remote::{MemoryRemote, Project, RemoteClient};
///
/// let remote = MemoryRemote::new();
/// let project = remote.add_project(&Project::new("Basin study")).unwrap();
/// assert!(project.id.is_some());
/// assert_eq!(remote.get_projects().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: RwLock<StoreState>,
}

impl MemoryRemote {
    /// Creates an empty remote.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a remote that already knows the given attribute names.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty.
    pub fn with_attributes<'a, I>(names: I) -> RemoteResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let remote = Self::new();
        for name in names {
            remote.add_attribute(&AttrPayload {
                id: None,
                name: name.to_string(),
                dimension: None,
            })?;
        }
        Ok(remote)
    }

    /// Number of stored networks.
    #[must_use]
    pub fn network_count(&self) -> usize {
        self.state.read().network_count()
    }
}

impl RemoteClient for MemoryRemote {
    fn get_all_attributes(&self) -> RemoteResult<Vec<AttrPayload>> {
        Ok(self.state.read().attributes())
    }

    fn add_attribute(&self, attr: &AttrPayload) -> RemoteResult<AttrPayload> {
        self.state.write().add_attribute(attr)
    }

    fn get_network(&self, network_id: NetworkId, include_data: bool) -> RemoteResult<NetworkPayload> {
        self.state.read().network(network_id, include_data)
    }

    fn get_network_project(&self, network_id: NetworkId) -> RemoteResult<Project> {
        self.state.read().network_project(network_id)
    }

    fn get_project(&self, project_id: ProjectId) -> RemoteResult<Project> {
        self.state.read().project(project_id)
    }

    fn add_project(&self, project: &Project) -> RemoteResult<Project> {
        self.state.write().add_project(project)
    }

    fn add_network(&self, network: &NetworkPayload) -> RemoteResult<NetworkSummary> {
        let summary = self.state.write().add_network(network)?;
        debug!(network = %summary.id, nodes = summary.node_count, "stored network");
        Ok(summary)
    }

    fn get_projects(&self) -> RemoteResult<Vec<Project>> {
        Ok(self.state.read().projects())
    }

    fn get_networks(&self, project_id: ProjectId) -> RemoteResult<Vec<NetworkBrief>> {
        self.state.read().networks(project_id)
    }
}
