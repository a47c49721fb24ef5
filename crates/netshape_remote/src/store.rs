//! Shared state behind the in-process remotes.

use crate::error::{RemoteError, RemoteResult};
use crate::payload::{
    AttrPayload, NetworkBrief, NetworkPayload, NetworkSummary, Project, ResourceAttrPayload,
    ScenarioBrief,
};
use netshape_core::{
    AttrId, LinkId, NetworkId, NodeId, ProjectId, ResourceAttrId, ScenarioId,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Everything a remote stores. Serialized as-is by [`crate::FileRemote`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    #[serde(default)]
    last_id: i64,
    #[serde(default)]
    attributes: Vec<AttrPayload>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    networks: Vec<NetworkPayload>,
}

fn unique_names<'a, I>(kind: &str, names: I) -> RemoteResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.to_lowercase()) {
            return Err(RemoteError::rejected(format!(
                "duplicate {kind} name `{name}`"
            )));
        }
    }
    Ok(())
}

impl StoreState {
    fn issue(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub(crate) fn attributes(&self) -> Vec<AttrPayload> {
        self.attributes.clone()
    }

    pub(crate) fn add_attribute(&mut self, attr: &AttrPayload) -> RemoteResult<AttrPayload> {
        if attr.name.trim().is_empty() {
            return Err(RemoteError::rejected("attribute name is empty"));
        }
        if let Some(existing) = self
            .attributes
            .iter()
            .find(|a| a.name == attr.name && a.dimension == attr.dimension)
        {
            return Ok(existing.clone());
        }
        let stored = AttrPayload {
            id: Some(AttrId::new(self.issue())),
            name: attr.name.clone(),
            dimension: attr.dimension.clone(),
        };
        self.attributes.push(stored.clone());
        Ok(stored)
    }

    pub(crate) fn network(&self, id: NetworkId, include_data: bool) -> RemoteResult<NetworkPayload> {
        let mut network = self
            .networks
            .iter()
            .find(|n| n.id == Some(id))
            .cloned()
            .ok_or_else(|| RemoteError::not_found("network", id.as_i64()))?;
        if !include_data {
            for scenario in &mut network.scenarios {
                scenario.resourcescenarios.clear();
            }
        }
        Ok(network)
    }

    pub(crate) fn network_project(&self, id: NetworkId) -> RemoteResult<Project> {
        let network = self
            .networks
            .iter()
            .find(|n| n.id == Some(id))
            .ok_or_else(|| RemoteError::not_found("network", id.as_i64()))?;
        let project_id = network
            .project_id
            .ok_or_else(|| RemoteError::rejected(format!("network {id} has no project")))?;
        self.project(project_id)
    }

    pub(crate) fn project(&self, id: ProjectId) -> RemoteResult<Project> {
        self.projects
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or_else(|| RemoteError::not_found("project", id.as_i64()))
    }

    pub(crate) fn add_project(&mut self, project: &Project) -> RemoteResult<Project> {
        if project.name.trim().is_empty() {
            return Err(RemoteError::rejected("project name is empty"));
        }
        if self.projects.iter().any(|p| p.name == project.name) {
            return Err(RemoteError::rejected(format!(
                "a project named `{}` exists",
                project.name
            )));
        }
        let mut stored = project.clone();
        stored.id = Some(ProjectId::new(self.issue()));
        self.projects.push(stored.clone());
        Ok(stored)
    }

    pub(crate) fn network_count(&self) -> usize {
        self.networks.len()
    }

    pub(crate) fn projects(&self) -> Vec<Project> {
        self.projects.clone()
    }

    pub(crate) fn networks(&self, project_id: ProjectId) -> RemoteResult<Vec<NetworkBrief>> {
        self.project(project_id)?;
        Ok(self
            .networks
            .iter()
            .filter(|n| n.project_id == Some(project_id))
            .filter_map(|n| {
                Some(NetworkBrief {
                    id: n.id?,
                    name: n.name.clone(),
                    scenarios: briefs(n),
                })
            })
            .collect())
    }

    fn check_attr(&self, binding: &ResourceAttrPayload) -> RemoteResult<()> {
        if self.attributes.iter().any(|a| a.id == Some(binding.attr_id)) {
            Ok(())
        } else {
            Err(RemoteError::rejected(format!(
                "unknown attribute {}",
                binding.attr_id
            )))
        }
    }

    /// Validates `network` and stores a copy with permanent identities.
    ///
    /// Nothing is stored and no identity is consumed if validation fails.
    pub(crate) fn add_network(&mut self, network: &NetworkPayload) -> RemoteResult<NetworkSummary> {
        let project_id = network
            .project_id
            .ok_or_else(|| RemoteError::rejected("network has no project"))?;
        self.project(project_id)?;
        if network.name.trim().is_empty() {
            return Err(RemoteError::rejected("network name is empty"));
        }
        unique_names("node", network.nodes.iter().map(|n| n.name.as_str()))?;
        unique_names("link", network.links.iter().map(|l| l.name.as_str()))?;

        let mut draft = self.clone();
        let mut net = network.clone();
        let network_id = NetworkId::new(draft.issue());
        net.id = Some(network_id);

        let mut node_ids: HashMap<NodeId, NodeId> = HashMap::new();
        for node in &mut net.nodes {
            let fresh = NodeId::new(draft.issue());
            if node_ids.insert(node.id, fresh).is_some() {
                return Err(RemoteError::rejected(format!("duplicate node {}", node.id)));
            }
            node.id = fresh;
        }

        let mut res_attr_ids: HashMap<ResourceAttrId, ResourceAttrId> = HashMap::new();
        let bindings = net
            .attributes
            .iter_mut()
            .chain(net.nodes.iter_mut().flat_map(|n| n.attributes.iter_mut()))
            .chain(net.links.iter_mut().flat_map(|l| l.attributes.iter_mut()));
        for binding in bindings {
            draft.check_attr(binding)?;
            let fresh = ResourceAttrId::new(draft.issue());
            if res_attr_ids.insert(binding.id, fresh).is_some() {
                return Err(RemoteError::rejected(format!(
                    "duplicate resource attribute {}",
                    binding.id
                )));
            }
            binding.id = fresh;
        }

        for link in &mut net.links {
            let endpoint = |id: NodeId| {
                node_ids.get(&id).copied().ok_or_else(|| {
                    RemoteError::rejected(format!("link `{}` references unknown {id}", link.name))
                })
            };
            let (start, end) = (endpoint(link.node_1_id)?, endpoint(link.node_2_id)?);
            link.node_1_id = start;
            link.node_2_id = end;
            link.id = LinkId::new(draft.issue());
        }

        for scenario in &mut net.scenarios {
            scenario.id = ScenarioId::new(draft.issue());
            for rs in &mut scenario.resourcescenarios {
                rs.resource_attr_id = res_attr_ids.get(&rs.resource_attr_id).copied().ok_or_else(
                    || {
                        RemoteError::rejected(format!(
                            "value for unknown resource attribute {}",
                            rs.resource_attr_id
                        ))
                    },
                )?;
            }
        }

        let summary = NetworkSummary {
            id: network_id,
            name: net.name.clone(),
            project_id,
            node_count: net.nodes.len(),
            link_count: net.links.len(),
            scenarios: briefs(&net),
        };
        draft.networks.push(net);
        *self = draft;
        Ok(summary)
    }
}

fn briefs(network: &NetworkPayload) -> Vec<ScenarioBrief> {
    network
        .scenarios
        .iter()
        .map(|s| ScenarioBrief {
            id: s.id,
            name: s.name.clone(),
        })
        .collect()
}
