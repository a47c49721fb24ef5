//! Loading and saving networks through the remote client.

use crate::error::AppResult;
use netshape_core::{
    AttrDef, AttrValue, Attribute, AttributeCatalog, CoreError, HasAttributes, IdAllocator, Link,
    Network, NetworkId, Node, ScenarioId,
};
use netshape_remote::{
    format_coordinate, AttrPayload, Dataset, Flag, LinkPayload, NetworkPayload, NetworkSummary,
    NodePayload, Project, RemoteClient, RemoteError, ResourceAttrPayload, ResourceScenario,
    ScenarioPayload,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Name of the scenario created with every saved network.
pub const SCENARIO_NAME: &str = "Scenario created by netshape";

const SCENARIO_DESCRIPTION: &str = "Standard scenario created by netshape.";
const DATASET_METADATA: &str = r#"{"source": "netshape"}"#;

/// Names used when saving a network.
#[derive(Debug, Clone, Default)]
pub struct SaveNames {
    /// Network name; defaults to one derived from the network's own name.
    pub network_name: Option<String>,
    /// Name of a project created on demand; defaults to a timestamp.
    pub project_name: Option<String>,
}

/// A unit of work against one remote.
pub struct NetworkSession<'c> {
    client: &'c dyn RemoteClient,
}

impl<'c> NetworkSession<'c> {
    /// Creates a session.
    pub fn new(client: &'c dyn RemoteClient) -> Self {
        Self { client }
    }

    /// Fetches the attribute catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails or a definition has no
    /// identity.
    pub fn load_catalog(&self) -> AppResult<AttributeCatalog> {
        self.client
            .get_all_attributes()?
            .into_iter()
            .map(|attr| -> AppResult<AttrDef> {
                let id = attr.id.ok_or_else(|| {
                    CoreError::invalid_payload(format!("attribute `{}` has no id", attr.name))
                })?;
                Ok(AttrDef {
                    id,
                    name: attr.name,
                    dimension: attr.dimension,
                })
            })
            .collect()
    }

    /// Loads a network with the values of one scenario.
    ///
    /// An attribute binding without a value in the scenario becomes a
    /// variable placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the network or scenario does not exist, or if the
    /// payload references unknown attributes or nodes.
    pub fn load_network(&self, network_id: NetworkId, scenario_id: ScenarioId) -> AppResult<Network> {
        let project = self.client.get_network_project(network_id)?;
        let payload = self.client.get_network(network_id, true)?;
        let catalog = self.load_catalog()?;

        let scenario = payload
            .scenario(scenario_id)
            .ok_or_else(|| RemoteError::not_found("scenario", scenario_id.as_i64()))?;
        let values: HashMap<_, _> = scenario
            .resourcescenarios
            .iter()
            .map(|rs| (rs.resource_attr_id, &rs.value))
            .collect();

        let mut network = Network::new(payload.name.clone());
        network.description = payload.description.clone();
        network.network_id = Some(network_id);
        network.project_id = project.id;
        network.set_epsg(payload.epsg());
        if network.epsg().is_none() {
            if let Some(projection) = &payload.projection {
                warn!(network = %network_id, projection = %projection, "could not read EPSG code");
            }
        }

        let bind = |entity: &mut dyn HasAttributes,
                    bindings: &[ResourceAttrPayload]|
         -> Result<(), CoreError> {
            for binding in bindings {
                let def = catalog.get(binding.attr_id).ok_or_else(|| {
                    CoreError::invalid_payload(format!("unknown attribute {}", binding.attr_id))
                })?;
                let value = values
                    .get(&binding.id)
                    .map(|ds| AttrValue::from_dataset(&ds.dataset_type, &ds.value))
                    .transpose()?;
                entity.add_attribute(Attribute::new(def.name.clone(), value).with_attr_id(def.id));
            }
            Ok(())
        };

        bind(&mut network, &payload.attributes)?;

        for payload_node in &payload.nodes {
            let x = parse_coordinate(&payload_node.x)?;
            let y = parse_coordinate(&payload_node.y)?;
            let mut node = Node::new(payload_node.id, payload_node.name.clone(), x, y)
                .with_types(payload_node.types.clone())
                .with_layout(payload_node.layout.clone());
            node.description = payload_node.description.clone();
            bind(&mut node, &payload_node.attributes)?;
            network.add_node(node);
        }

        for payload_link in &payload.links {
            let mut link = Link::new(
                payload_link.id,
                payload_link.name.clone(),
                payload_link.node_1_id,
                payload_link.node_2_id,
            )
            .with_types(payload_link.types.clone())
            .with_layout(payload_link.layout.clone());
            link.description = payload_link.description.clone();
            bind(&mut link, &payload_link.attributes)?;
            network.add_link(link)?;
        }

        network.set_catalog(catalog);
        info!(
            network = %network_id,
            scenario = %scenario_id,
            nodes = network.node_count(),
            links = network.link_count(),
            "loaded network"
        );
        Ok(network)
    }

    fn ensure_project(&self, network: &mut Network, name: Option<&str>) -> AppResult<()> {
        if let Some(id) = network.project_id {
            self.client.get_project(id)?;
            return Ok(());
        }
        let name = name.map_or_else(
            || format!("Shapefile import @ {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f")),
            str::to_string,
        );
        let project = self.client.add_project(&Project::new(name))?;
        info!(project = %project.name, "created project");
        network.project_id = project.id;
        Ok(())
    }

    fn ensure_attributes(&self, network: &mut Network) -> AppResult<()> {
        let names: BTreeSet<String> = network
            .iter_attributes()
            .chain(network.nodes().flat_map(|n| n.iter_attributes()))
            .chain(network.links().flat_map(|l| l.iter_attributes()))
            .map(|a| a.name.clone())
            .filter(|name| network.catalog().id_of(name).is_none())
            .collect();
        for name in names {
            let created = self.client.add_attribute(&AttrPayload {
                id: None,
                name: name.clone(),
                dimension: None,
            })?;
            let id = created.id.ok_or_else(|| {
                CoreError::invalid_payload(format!("attribute `{name}` created without id"))
            })?;
            debug!(attribute = %name, id = %id, "created attribute");
            network.catalog_mut().insert(AttrDef {
                id,
                name,
                dimension: created.dimension,
            });
        }
        Ok(())
    }

    /// Saves `network` as a new remote network.
    ///
    /// Creates a project first if the network has none, and any attribute
    /// definition missing from the catalog. On success the network records
    /// its new remote identity.
    ///
    /// The network is checked against the remote's acceptance rules before
    /// anything is created, so a rejected network leaves no project or
    /// attribute behind. A failure of `add_network` itself after that point
    /// can still leave them, as the remote offers no delete.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPayload`] if node or link names clash or
    /// a link endpoint is missing, or an error if a remote call fails.
    pub fn save_network(&self, network: &mut Network, names: &SaveNames) -> AppResult<NetworkSummary> {
        check_saveable(network)?;
        self.ensure_project(network, names.project_name.as_deref())?;
        self.ensure_attributes(network)?;

        let mut ids = std::mem::take(network.allocator_mut());
        let payload = build_payload(network, names, &mut ids);
        *network.allocator_mut() = ids;
        let payload = payload?;

        let summary = self.client.add_network(&payload)?;
        network.network_id = Some(summary.id);
        info!(
            network = %summary.id,
            name = %summary.name,
            nodes = summary.node_count,
            links = summary.link_count,
            "saved network"
        );
        Ok(summary)
    }
}

/// Local mirror of the remote's rejection rules for a new network.
fn check_saveable(network: &Network) -> Result<(), CoreError> {
    fn unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.to_lowercase()) {
                return Err(CoreError::invalid_payload(format!(
                    "duplicate {kind} name `{name}`"
                )));
            }
        }
        Ok(())
    }
    unique("node", network.nodes().map(|n| n.name.as_str()))?;
    unique("link", network.links().map(|l| l.name.as_str()))?;
    for link in network.links() {
        network.link_endpoints(link)?;
    }
    Ok(())
}

fn parse_coordinate(text: &str) -> Result<f64, CoreError> {
    text.trim()
        .parse()
        .map_err(|_| CoreError::invalid_payload(format!("coordinate '{text}' is not a number")))
}

struct PayloadBuilder<'a> {
    network: &'a Network,
    ids: &'a mut IdAllocator,
    values: Vec<ResourceScenario>,
}

impl PayloadBuilder<'_> {
    fn bindings<'e, I>(&mut self, attributes: I) -> AppResult<Vec<ResourceAttrPayload>>
    where
        I: Iterator<Item = &'e Attribute>,
    {
        let mut bindings = Vec::new();
        for attribute in attributes {
            let attr_id = self.network.catalog().id_of(&attribute.name).ok_or_else(|| {
                CoreError::invalid_payload(format!("attribute `{}` not in catalog", attribute.name))
            })?;
            let id = self.ids.next_resource_attr();
            if let Some(value) = &attribute.value {
                self.values.push(ResourceScenario {
                    resource_attr_id: id,
                    attr_id,
                    value: Dataset {
                        id: None,
                        dataset_type: value.dataset_type().to_string(),
                        name: format!("Shapefile data {}", attribute.name),
                        value: value.dataset_value(),
                        unit: None,
                        dimension: None,
                        hidden: Flag::No,
                        metadata: DATASET_METADATA.to_string(),
                    },
                });
            }
            bindings.push(ResourceAttrPayload {
                id,
                attr_id,
                attr_is_var: Flag::from(attribute.value.is_none()),
            });
        }
        Ok(bindings)
    }
}

fn build_payload(
    network: &Network,
    names: &SaveNames,
    ids: &mut IdAllocator,
) -> AppResult<NetworkPayload> {
    let mut builder = PayloadBuilder {
        network,
        ids,
        values: Vec::new(),
    };

    let mut nodes = Vec::with_capacity(network.node_count());
    for node in network.nodes() {
        nodes.push(NodePayload {
            id: node.id,
            name: node.name.clone(),
            description: node.description.clone(),
            x: format_coordinate(node.x),
            y: format_coordinate(node.y),
            layout: node.layout.clone(),
            types: node.types.clone(),
            attributes: builder.bindings(node.iter_attributes())?,
        });
    }

    let mut links = Vec::with_capacity(network.link_count());
    for link in network.links() {
        links.push(LinkPayload {
            id: link.id,
            name: link.name.clone(),
            description: link.description.clone(),
            node_1_id: link.start,
            node_2_id: link.end,
            layout: link.layout.clone(),
            types: link.types.clone(),
            attributes: builder.bindings(link.iter_attributes())?,
        });
    }

    let attributes = builder.bindings(network.iter_attributes())?;

    let scenario = ScenarioPayload {
        id: ScenarioId::new(-1),
        name: SCENARIO_NAME.to_string(),
        description: SCENARIO_DESCRIPTION.to_string(),
        resourcescenarios: builder.values,
    };

    Ok(NetworkPayload {
        id: None,
        name: names
            .network_name
            .clone()
            .unwrap_or_else(|| format!("Network imported from shapefile ({})", network.name)),
        description: format!("Network imported from {}", network.name),
        project_id: network.project_id,
        projection: network.epsg().map(|code| format!("EPSG:{code}")),
        nodes,
        links,
        attributes,
        scenarios: vec![scenario],
    })
}

