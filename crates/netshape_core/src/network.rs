//! In-memory network graph.

use crate::catalog::AttributeCatalog;
use crate::coord::CoordinateIndex;
use crate::entity::{HasAttributes, Link, Node};
use crate::error::{CoreError, CoreResult};
use crate::ids::IdAllocator;
use crate::types::{LinkId, NetworkId, NodeId, ProjectId};
use crate::value::Attribute;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Case-insensitive name registry that hands out collision suffixes.
#[derive(Debug, Clone, Default)]
struct NameRegistry {
    // lowercase stored names, suffixed ones included
    taken: HashSet<String>,
    // next suffix per lowercase requested name
    counters: HashMap<String, u32>,
}

impl NameRegistry {
    /// Returns the name to store, or `None` if `name` is still free.
    ///
    /// The first collision with a name yields `"<name> (1)"`, the next
    /// `"<name> (2)"` and so on. Suffixes already stored under another
    /// spelling are skipped, so every stored name stays distinct.
    fn claim(&mut self, name: &str) -> Option<String> {
        let key = name.to_lowercase();
        if self.taken.insert(key.clone()) {
            return None;
        }
        let counter = self.counters.entry(key).or_insert(1);
        loop {
            let renamed = format!("{name} ({counter})");
            *counter += 1;
            if self.taken.insert(renamed.to_lowercase()) {
                return Some(renamed);
            }
        }
    }
}

/// Aggregate root of one network.
///
/// Owns every node and link, the coordinate index, the name registries, the
/// attribute catalog, the placeholder allocator and network-level
/// attributes. All mutation goes through `&mut self`; nothing here is
/// synchronized.
#[derive(Debug, Clone, Default)]
pub struct Network {
    /// Network name.
    pub name: String,
    /// Network description.
    pub description: String,
    /// Remote identity, when loaded from or saved to the remote system.
    pub network_id: Option<NetworkId>,
    /// Containing project.
    pub project_id: Option<ProjectId>,
    epsg: Option<u32>,
    nodes: HashMap<NodeId, Node>,
    node_order: Vec<NodeId>,
    links: Vec<Link>,
    coords: CoordinateIndex,
    node_names: NameRegistry,
    link_names: NameRegistry,
    catalog: AttributeCatalog,
    ids: IdAllocator,
    attributes: BTreeMap<String, Attribute>,
}

impl Network {
    /// Creates an empty network.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a node, disambiguating its name and indexing its coordinate.
    ///
    /// The stored node's `name` may differ from the one passed in.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        if let Some(renamed) = self.node_names.claim(&node.name) {
            debug!(from = %node.name, to = %renamed, "node name collision");
            node.name = renamed;
        }
        let id = node.id;
        self.coords.insert(id, node.x, node.y);
        if self.nodes.insert(id, node).is_none() {
            self.node_order.push(id);
        }
        id
    }

    /// Adds a link, disambiguating its name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownNode`] if either endpoint is not part of
    /// this network. The link is not stored in that case.
    pub fn add_link(&mut self, mut link: Link) -> CoreResult<LinkId> {
        for endpoint in [link.start, link.end] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(CoreError::UnknownNode {
                    node_id: endpoint.as_i64(),
                });
            }
        }
        if let Some(renamed) = self.link_names.claim(&link.name) {
            debug!(from = %link.name, to = %renamed, "link name collision");
            link.name = renamed;
        }
        let id = link.id;
        self.links.push(link);
        Ok(id)
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Looks up a node for attribute updates.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Looks up a link.
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Resolves the endpoints of a link.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownNode`] if an endpoint is missing.
    pub fn link_endpoints(&self, link: &Link) -> CoreResult<(&Node, &Node)> {
        let lookup = |id: NodeId| {
            self.nodes.get(&id).ok_or(CoreError::UnknownNode {
                node_id: id.as_i64(),
            })
        };
        Ok((lookup(link.start)?, lookup(link.end)?))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Coordinate index over all nodes.
    #[must_use]
    pub fn coords(&self) -> &CoordinateIndex {
        &self.coords
    }

    /// Mutable coordinate index, for rounded lookups.
    pub fn coords_mut(&mut self) -> &mut CoordinateIndex {
        &mut self.coords
    }

    /// Attribute catalog.
    #[must_use]
    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// Mutable attribute catalog.
    pub fn catalog_mut(&mut self) -> &mut AttributeCatalog {
        &mut self.catalog
    }

    /// Replaces the attribute catalog.
    pub fn set_catalog(&mut self, catalog: AttributeCatalog) {
        self.catalog = catalog;
    }

    /// Placeholder identity allocator.
    pub fn allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// EPSG code of the coordinate reference system, if known.
    #[must_use]
    pub const fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Sets the coordinate reference system.
    pub fn set_epsg(&mut self, epsg: Option<u32>) {
        self.epsg = epsg;
    }
}

impl HasAttributes for Network {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut BTreeMap<String, Attribute> {
        &mut self.attributes
    }
}
