//! Nodes, links and the attribute capability they share.

use crate::types::{LinkId, NodeId};
use crate::value::{AttrValue, Attribute};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::btree_map::{self, BTreeMap};

/// A type tag assigned from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTag {
    /// Type identity in the remote system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Type name.
    pub name: String,
    /// Owning template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
}

impl TypeTag {
    /// Creates a tag with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            template_id: None,
        }
    }
}

/// Attribute storage shared by nodes and links.
pub trait HasAttributes {
    /// Attribute map keyed by name.
    fn attributes(&self) -> &BTreeMap<String, Attribute>;

    /// Mutable attribute map.
    fn attributes_mut(&mut self) -> &mut BTreeMap<String, Attribute>;

    /// Adds or replaces an attribute.
    fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes_mut()
            .insert(attribute.name.clone(), attribute);
    }

    /// Adds an attribute from a name and optional value.
    fn set_attribute(&mut self, name: &str, value: Option<AttrValue>) {
        self.add_attribute(Attribute::new(name, value));
    }

    /// Looks up an attribute by name.
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().get(name)
    }

    /// Iterates attributes in name order.
    fn iter_attributes(&self) -> btree_map::Values<'_, String, Attribute> {
        self.attributes().values()
    }
}

/// A named, typed, attributed network element.
pub trait Resource: HasAttributes {
    /// Display name.
    fn name(&self) -> &str;

    /// Type tags in assignment order.
    fn types(&self) -> &[TypeTag];
}

/// A network vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Identity; negative until persisted.
    pub id: NodeId,
    /// Display name. Rewritten by the graph on collision.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Planar x coordinate.
    pub x: f64,
    /// Planar y coordinate.
    pub y: f64,
    /// Type tags.
    pub types: Vec<TypeTag>,
    /// Opaque layout payload.
    pub layout: Json,
    attributes: BTreeMap<String, Attribute>,
}

impl Node {
    /// Creates an untyped node without attributes.
    pub fn new(id: NodeId, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            x,
            y,
            types: Vec::new(),
            layout: Json::Null,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the type tags.
    #[must_use]
    pub fn with_types(mut self, types: Vec<TypeTag>) -> Self {
        self.types = types;
        self
    }

    /// Sets the layout payload.
    #[must_use]
    pub fn with_layout(mut self, layout: Json) -> Self {
        self.layout = layout;
        self
    }

    /// Coordinate pair.
    #[must_use]
    pub const fn coord(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl HasAttributes for Node {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut BTreeMap<String, Attribute> {
        &mut self.attributes
    }
}

impl Resource for Node {
    fn name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> &[TypeTag] {
        &self.types
    }
}

/// A network edge between two existing nodes.
///
/// Endpoints are referenced by identity; the graph owns the nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Identity; negative until persisted.
    pub id: LinkId,
    /// Display name. Rewritten by the graph on collision.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Upstream node.
    pub start: NodeId,
    /// Downstream node.
    pub end: NodeId,
    /// Type tags.
    pub types: Vec<TypeTag>,
    /// Opaque layout payload; may hold a `geometry` override.
    pub layout: Json,
    attributes: BTreeMap<String, Attribute>,
}

impl Link {
    /// Creates an untyped link without attributes.
    pub fn new(id: LinkId, name: impl Into<String>, start: NodeId, end: NodeId) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            start,
            end,
            types: Vec::new(),
            layout: Json::Null,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the type tags.
    #[must_use]
    pub fn with_types(mut self, types: Vec<TypeTag>) -> Self {
        self.types = types;
        self
    }

    /// Sets the layout payload.
    #[must_use]
    pub fn with_layout(mut self, layout: Json) -> Self {
        self.layout = layout;
        self
    }

    /// Geometry stored in the layout, if the layout carries one.
    #[must_use]
    pub fn layout_geometry(&self) -> Option<&Json> {
        self.layout.get("geometry")
    }
}

impl HasAttributes for Link {
    fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut BTreeMap<String, Attribute> {
        &mut self.attributes
    }
}

impl Resource for Link {
    fn name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> &[TypeTag] {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attributes_replace_by_name() {
        let mut node = Node::new(NodeId::new(-1), "A", 0.0, 0.0);
        node.set_attribute("depth", Some(AttrValue::Scalar(1.0)));
        node.set_attribute("depth", Some(AttrValue::Scalar(2.0)));
        assert_eq!(node.iter_attributes().count(), 1);
        assert_eq!(
            node.attribute("depth").unwrap().value,
            Some(AttrValue::Scalar(2.0))
        );
    }

    #[test]
    fn layout_geometry_lookup() {
        let link = Link::new(LinkId::new(-1), "L", NodeId::new(-1), NodeId::new(-2))
            .with_layout(json!({"geometry": {"type": "LineString", "coordinates": []}}));
        assert!(link.layout_geometry().is_some());

        let plain = Link::new(LinkId::new(-2), "M", NodeId::new(-1), NodeId::new(-2));
        assert!(plain.layout_geometry().is_none());
    }
}
