//! Turning geometry features into graph entities.
//!
//! Node features become nodes directly. Link features need endpoint nodes,
//! which are either derived from the line's first and last vertex
//! ([`NodeMode::Create`]) or matched against nodes ingested earlier
//! ([`NodeMode::Match`]).

use crate::config::MatchPolicy;
use crate::coord::CoordinateIndex;
use crate::entity::{HasAttributes, Link, Node};
use crate::error::{CoreError, CoreResult};
use crate::feature::{Feature, Geometry, Position};
use crate::network::Network;
use crate::types::{LinkId, NodeId};
use crate::value::AttrValue;
use serde_json::{json, Map, Value as Json};
use tracing::debug;

/// How link endpoints are turned into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMode {
    /// Reuse a node at the exact endpoint coordinate or create one.
    Create,
    /// The endpoint must match an existing node within the policy bounds.
    Match(MatchPolicy),
}

/// Result of a coordinate match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordMatch {
    /// Matched node.
    pub node_id: NodeId,
    /// Precision at which the match was found; `None` for an exact hit.
    pub decimals: Option<u32>,
}

/// Looks a coordinate up exactly, then at decreasing precision.
pub fn match_coordinate(
    index: &mut CoordinateIndex,
    x: f64,
    y: f64,
    policy: &MatchPolicy,
) -> Option<CoordMatch> {
    if let Some(node_id) = index.get_exact(x, y) {
        return Some(CoordMatch {
            node_id,
            decimals: None,
        });
    }
    policy.levels().find_map(|decimals| {
        index.get_rounded(x, y, decimals).map(|node_id| CoordMatch {
            node_id,
            decimals: Some(decimals),
        })
    })
}

/// Moves feature properties onto an entity.
///
/// Returns the display name if a `name` property (any case) was present.
fn apply_properties<E: HasAttributes>(entity: &mut E, properties: &Map<String, Json>) -> Option<String> {
    let mut name = None;
    for (key, value) in properties {
        if Feature::is_name_key(key) {
            name = match value {
                Json::Null => name,
                Json::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            };
        } else {
            entity.set_attribute(key, AttrValue::from_property(value));
        }
    }
    name
}

/// Builds nodes and links in a network from features.
pub struct Reconciler<'n> {
    network: &'n mut Network,
    mode: NodeMode,
}

impl<'n> Reconciler<'n> {
    /// Creates a reconciler over `network`.
    pub fn new(network: &'n mut Network, mode: NodeMode) -> Self {
        Self { network, mode }
    }

    /// Endpoint handling mode.
    #[must_use]
    pub const fn mode(&self) -> NodeMode {
        self.mode
    }

    /// Adds a node from a point feature.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::GeometryTypeMismatch`] for any geometry other
    /// than a point.
    pub fn add_node_feature(&mut self, feature: &Feature) -> CoreResult<NodeId> {
        let Geometry::Point([x, y]) = feature.geometry else {
            return Err(CoreError::geometry_type_mismatch(
                feature.geometry.type_name(),
            ));
        };
        let id = self.network.allocator_mut().next_node();
        let mut node = Node::new(id, String::new(), x, y);
        node.name = apply_properties(&mut node, &feature.properties)
            .unwrap_or_else(|| format!("Node {}", id.as_i64().abs()));
        Ok(self.network.add_node(node))
    }

    /// Adds a link from a line feature, resolving or creating its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidGeometry`] if the geometry is not a line
    /// with at least two vertices, and [`CoreError::UnresolvedCoordinate`]
    /// if an endpoint cannot be matched in [`NodeMode::Match`].
    pub fn add_link_feature(&mut self, feature: &Feature) -> CoreResult<LinkId> {
        let geometry = &feature.geometry;
        let vertices = geometry.vertex_count().ok_or_else(|| {
            CoreError::invalid_geometry(format!(
                "expected LineString or MultiLineString, got {}",
                geometry.type_name()
            ))
        })?;
        let (first, last) = match geometry.endpoints() {
            Some(ends) if vertices >= 2 => ends,
            _ => {
                return Err(CoreError::invalid_geometry(format!(
                    "a link path needs at least 2 vertices, got {vertices}"
                )))
            }
        };

        let start = self.resolve_endpoint(first)?;
        let end = self.resolve_endpoint(last)?;

        let id = self.network.allocator_mut().next_link();
        let mut link = Link::new(id, String::new(), start, end)
            .with_layout(json!({ "geometry": geometry.to_json() }));
        link.name = apply_properties(&mut link, &feature.properties)
            .unwrap_or_else(|| format!("Link {}", id.as_i64().abs()));
        self.network.add_link(link)
    }

    fn resolve_endpoint(&mut self, [x, y]: Position) -> CoreResult<NodeId> {
        match self.mode {
            NodeMode::Create => {
                if let Some(id) = self.network.coords().get_exact(x, y) {
                    return Ok(id);
                }
                let id = self.network.allocator_mut().next_node();
                let node = Node::new(id, format!("Node {}", id.as_i64().abs()), x, y);
                Ok(self.network.add_node(node))
            }
            NodeMode::Match(policy) => {
                let found = match_coordinate(self.network.coords_mut(), x, y, &policy).ok_or(
                    CoreError::UnresolvedCoordinate {
                        x,
                        y,
                        min_decimals: policy.min_decimals,
                    },
                )?;
                if let Some(decimals) = found.decimals {
                    debug!(x, y, decimals, node = %found.node_id, "endpoint matched after rounding");
                }
                Ok(found.node_id)
            }
        }
    }
}
