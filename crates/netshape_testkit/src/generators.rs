//! Property-based test generators using proptest.
//!
//! Provides strategies for generating features and attribute values that
//! the reconciliation pipeline accepts.

use netshape_core::{Feature, Geometry, Position};
use proptest::prelude::*;
use serde_json::Value as Json;

/// Strategy for entity names, including non-ASCII letters and names shaped
/// like collision suffixes (`"Weir (2)"`).
pub fn name_strategy() -> impl Strategy<Value = String> {
    let base = || {
        prop::string::string_regex("[A-Za-zÄÖÜäöüß][A-Za-z0-9äöü _-]{0,15}")
            .expect("Invalid regex")
    };
    prop_oneof![
        3 => base(),
        1 => (base(), 1u32..5).prop_map(|(b, n)| format!("{b} ({n})")),
    ]
}

/// Strategy for attribute names that never collide with `name`.
pub fn attribute_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("attr_[a-z0-9]{1,8}").expect("Invalid regex")
}

/// Strategy for finite planar positions on a 0.001 grid.
pub fn position_strategy() -> impl Strategy<Value = Position> {
    (-1_000_000i64..1_000_000, -1_000_000i64..1_000_000)
        .prop_map(|(x, y)| [x as f64 / 1000.0, y as f64 / 1000.0])
}

/// Strategy for property values: null, booleans, numbers and strings.
pub fn property_value_strategy() -> impl Strategy<Value = Json> {
    prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        (-1.0e6f64..1.0e6).prop_map(Json::from),
        "[a-z ]{0,12}".prop_map(Json::String),
    ]
}

/// Strategy for line features with 2 to 8 vertices and a few properties.
pub fn line_feature_strategy() -> impl Strategy<Value = Feature> {
    (
        prop::collection::vec(position_strategy(), 2..8),
        prop::collection::btree_map(attribute_name_strategy(), property_value_strategy(), 0..4),
    )
        .prop_map(|(coords, properties)| {
            let mut feature = Feature::new(Geometry::LineString(coords));
            feature.properties = properties.into_iter().collect();
            feature
        })
}

/// Strategy for a batch of line features.
pub fn line_layer_strategy(max: usize) -> impl Strategy<Value = Vec<Feature>> {
    prop::collection::vec(line_feature_strategy(), 1..max.max(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_lines_are_valid_links(feature in line_feature_strategy()) {
            let vertices = feature.geometry.vertex_count().unwrap();
            prop_assert!(vertices >= 2);
            prop_assert!(feature.properties.keys().all(|k| !Feature::is_name_key(k)));
        }

        #[test]
        fn generated_names_are_stored_distinct(names in prop::collection::vec(name_strategy(), 1..30)) {
            let mut net = netshape_core::Network::new("names");
            for (i, name) in names.iter().enumerate() {
                let id = netshape_core::NodeId::new(-(i as i64) - 1);
                net.add_node(netshape_core::Node::new(id, name.clone(), i as f64, 0.0));
            }
            let stored: std::collections::HashSet<String> =
                net.nodes().map(|n| n.name.to_lowercase()).collect();
            prop_assert_eq!(stored.len(), names.len());
        }

        #[test]
        fn positions_are_finite(p in position_strategy()) {
            prop_assert!(p[0].is_finite() && p[1].is_finite());
        }
    }
}
