//! Request and response messages of the remote network model.
//!
//! Field names follow the remote service's JSON: links name their endpoints
//! `node_1_id`/`node_2_id`, node coordinates travel as decimal strings, and
//! yes/no flags are the letters `Y` and `N`.

use netshape_core::{
    AttrId, LinkId, NetworkId, NodeId, ProjectId, ResourceAttrId, ScenarioId, TypeTag,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;

/// A yes/no flag encoded as `Y` or `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flag {
    /// `Y`
    #[serde(rename = "Y")]
    Yes,
    /// `N`
    #[default]
    #[serde(rename = "N")]
    No,
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl Flag {
    /// True for `Y`.
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Identity; `None` before the project is created.
    #[serde(default)]
    pub id: Option<ProjectId>,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Status letter, `A` for active.
    #[serde(default = "active")]
    pub status: String,
}

fn active() -> String {
    "A".to_string()
}

impl Project {
    /// A new, uncreated active project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            status: active(),
        }
    }
}

/// An attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrPayload {
    /// Identity; `None` when requesting creation.
    #[serde(default)]
    pub id: Option<AttrId>,
    /// Name.
    pub name: String,
    /// Physical dimension.
    #[serde(default)]
    pub dimension: Option<String>,
}

/// Binding of an attribute to one node, link or network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttrPayload {
    /// Identity; negative when not yet persisted.
    pub id: ResourceAttrId,
    /// Bound attribute definition.
    pub attr_id: AttrId,
    /// `Y` if the value is produced by a model run rather than stored.
    #[serde(default)]
    pub attr_is_var: Flag,
}

/// A stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Identity; `None` for new datasets.
    #[serde(default)]
    pub id: Option<i64>,
    /// Dataset type: `scalar`, `descriptor`, `array` or `timeseries`.
    #[serde(rename = "type")]
    pub dataset_type: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Textual value.
    pub value: String,
    /// Unit.
    #[serde(default)]
    pub unit: Option<String>,
    /// Physical dimension.
    #[serde(default)]
    pub dimension: Option<String>,
    /// Hidden flag.
    #[serde(default)]
    pub hidden: Flag,
    /// Metadata as a JSON object string.
    #[serde(default)]
    pub metadata: String,
}

/// The value of one resource attribute within a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceScenario {
    /// Resource attribute the value belongs to.
    pub resource_attr_id: ResourceAttrId,
    /// Attribute definition.
    pub attr_id: AttrId,
    /// The value.
    pub value: Dataset,
}

/// A scenario and its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPayload {
    /// Identity; negative when not yet persisted.
    pub id: ScenarioId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Values, one per non-variable resource attribute.
    #[serde(default)]
    pub resourcescenarios: Vec<ResourceScenario>,
}

fn coordinate_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(f64),
    }
    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => format!("{n:?}"),
    })
}

/// Formats a coordinate so that parsing it gives back the same `f64`.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    format!("{value:?}")
}

/// A node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    /// Identity; negative when not yet persisted.
    pub id: NodeId,
    /// Name, unique within the network.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// X coordinate as decimal text.
    #[serde(deserialize_with = "coordinate_text")]
    pub x: String,
    /// Y coordinate as decimal text.
    #[serde(deserialize_with = "coordinate_text")]
    pub y: String,
    /// Opaque layout.
    #[serde(default)]
    pub layout: Json,
    /// Type tags.
    #[serde(default)]
    pub types: Vec<TypeTag>,
    /// Attribute bindings.
    #[serde(default)]
    pub attributes: Vec<ResourceAttrPayload>,
}

/// A link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPayload {
    /// Identity; negative when not yet persisted.
    pub id: LinkId,
    /// Name, unique within the network.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Start node.
    pub node_1_id: NodeId,
    /// End node.
    pub node_2_id: NodeId,
    /// Opaque layout.
    #[serde(default)]
    pub layout: Json,
    /// Type tags.
    #[serde(default)]
    pub types: Vec<TypeTag>,
    /// Attribute bindings.
    #[serde(default)]
    pub attributes: Vec<ResourceAttrPayload>,
}

/// A complete network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPayload {
    /// Identity; `None` when requesting creation.
    #[serde(default)]
    pub id: Option<NetworkId>,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Owning project.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Coordinate reference system, as `EPSG:<code>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<String>,
    /// Nodes.
    #[serde(default)]
    pub nodes: Vec<NodePayload>,
    /// Links.
    #[serde(default)]
    pub links: Vec<LinkPayload>,
    /// Network-level attribute bindings.
    #[serde(default)]
    pub attributes: Vec<ResourceAttrPayload>,
    /// Scenarios.
    #[serde(default)]
    pub scenarios: Vec<ScenarioPayload>,
}

impl NetworkPayload {
    /// EPSG code named by `projection`, if it parses.
    #[must_use]
    pub fn epsg(&self) -> Option<u32> {
        let projection = self.projection.as_deref()?;
        let (_, code) = projection.split_once(':')?;
        code.trim().parse().ok()
    }

    /// Scenario with the given identity.
    #[must_use]
    pub fn scenario(&self, id: ScenarioId) -> Option<&ScenarioPayload> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

/// Scenario identity and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioBrief {
    /// Identity.
    pub id: ScenarioId,
    /// Name.
    pub name: String,
}

/// Result of creating a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Assigned identity.
    pub id: NetworkId,
    /// Name.
    pub name: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Number of stored nodes.
    pub node_count: usize,
    /// Number of stored links.
    pub link_count: usize,
    /// Created scenarios with their assigned identities.
    pub scenarios: Vec<ScenarioBrief>,
}

/// Network listing entry, without nodes or data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkBrief {
    /// Identity.
    pub id: NetworkId,
    /// Name.
    pub name: String,
    /// Scenarios.
    pub scenarios: Vec<ScenarioBrief>,
}
