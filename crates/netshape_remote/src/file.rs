//! JSON-file remote.

use crate::client::RemoteClient;
use crate::error::RemoteResult;
use crate::payload::{AttrPayload, NetworkBrief, NetworkPayload, NetworkSummary, Project};
use crate::store::StoreState;
use netshape_core::{NetworkId, ProjectId};
use parking_lot::RwLock;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A remote persisted to a single JSON file.
///
/// The whole store is rewritten after every successful change. The new
/// contents go to a sibling temporary file that is renamed over the old one,
/// so a failed write leaves the previous store intact.
///
/// # Example
///
/// ```no_run
/// use netshape_remote::{FileRemote, RemoteClient};
/// use std::path::Path;
///
/// let remote = FileRemote::open(Path::new("netshape-store.json")).unwrap();
/// for project in remote.get_projects().unwrap() {
///     println!("{}", project.name);
/// }
/// ```
#[derive(Debug)]
pub struct FileRemote {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileRemote {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> RemoteResult<Self> {
        let state = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            state: RwLock::new(state),
        })
    }

    /// Returns the path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &StoreState) -> RemoteResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&serde_json::to_vec_pretty(state)?)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "store written");
        Ok(())
    }

    /// Applies `change` to a copy of the state and commits it once the file
    /// is written.
    fn mutate<T>(&self, change: impl FnOnce(&mut StoreState) -> RemoteResult<T>) -> RemoteResult<T> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(out)
    }
}

impl RemoteClient for FileRemote {
    fn get_all_attributes(&self) -> RemoteResult<Vec<AttrPayload>> {
        Ok(self.state.read().attributes())
    }

    fn add_attribute(&self, attr: &AttrPayload) -> RemoteResult<AttrPayload> {
        self.mutate(|s| s.add_attribute(attr))
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
        self.mutate(|s| s.add_project(project))
    }

    fn add_network(&self, network: &NetworkPayload) -> RemoteResult<NetworkSummary> {
        self.mutate(|s| s.add_network(network))
    }

    fn get_projects(&self) -> RemoteResult<Vec<Project>> {
        Ok(self.state.read().projects())
    }

    fn get_networks(&self, project_id: ProjectId) -> RemoteResult<Vec<NetworkBrief>> {
        self.state.read().networks(project_id)
    }
}
