//! Property tests for the graph and reconciler.

use netshape_core::{
    Feature, Geometry, MatchPolicy, Network, Node, NodeId, NodeMode, Reconciler,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn name_strategy() -> impl Strategy<Value = String> {
    let base = prop::sample::select(vec!["Lake", "lake", "LAKE", "Weir", "weir", "Gauge"]);
    prop_oneof![
        base.clone().prop_map(str::to_string),
        // shapes that collide with issued suffixes
        (base.clone(), 1u32..4).prop_map(|(b, n)| format!("{b} ({n})")),
        (base, 1u32..3, 1u32..3).prop_map(|(b, n, m)| format!("{b} ({n}) ({m})")),
    ]
}

proptest! {
    #[test]
    fn stored_node_names_are_distinct(names in prop::collection::vec(name_strategy(), 1..40)) {
        let mut net = Network::new("p");
        for (i, name) in names.iter().enumerate() {
            let id = -(i as i64) - 1;
            net.add_node(Node::new(NodeId::new(id), name.clone(), i as f64, 0.0));
        }
        let stored: HashSet<String> = net.nodes().map(|n| n.name.to_lowercase()).collect();
        prop_assert_eq!(stored.len(), names.len());
    }

    #[test]
    fn create_mode_node_count_matches_distinct_endpoints(
        segments in prop::collection::vec(((0i32..6, 0i32..6), (0i32..6, 0i32..6)), 1..30)
    ) {
        let mut net = Network::new("p");
        let mut distinct = HashSet::new();
        {
            let mut rec = Reconciler::new(&mut net, NodeMode::Create);
            for ((x1, y1), (x2, y2)) in &segments {
                distinct.insert((*x1, *y1));
                distinct.insert((*x2, *y2));
                let feature = Feature::new(Geometry::LineString(vec![
                    [f64::from(*x1), f64::from(*y1)],
                    [f64::from(*x2), f64::from(*y2)],
                ]));
                rec.add_link_feature(&feature).unwrap();
            }
        }
        prop_assert_eq!(net.node_count(), distinct.len());
        prop_assert_eq!(net.link_count(), segments.len());
    }

    #[test]
    fn match_mode_resolves_noisy_endpoints(
        x in -1.0e5f64..1.0e5,
        y in -1.0e5f64..1.0e5,
        noise in -1.0e-9f64..1.0e-9,
    ) {
        let mut net = Network::new("p");
        let far_x = x + 1000.0;
        let (a, b) = {
            let mut rec = Reconciler::new(&mut net, NodeMode::Match(MatchPolicy::default()));
            let a = rec.add_node_feature(&Feature::new(Geometry::Point([x, y]))).unwrap();
            let b = rec.add_node_feature(&Feature::new(Geometry::Point([far_x, y]))).unwrap();
            let link = Feature::new(Geometry::LineString(vec![[x + noise, y], [far_x, y - noise]]));
            rec.add_link_feature(&link).unwrap();
            (a, b)
        };
        let link = net.links().next().unwrap();
        prop_assert_eq!(link.start, a);
        prop_assert_eq!(link.end, b);
    }
}

#[test]
fn collision_suffixes_follow_call_order() {
    let mut net = Network::new("t");
    for (i, name) in ["Lake", "lake", "LAKE"].iter().enumerate() {
        net.add_node(Node::new(NodeId::new(-(i as i64) - 1), *name, 0.0, i as f64));
    }
    let names: Vec<_> = net.nodes().map(|n| n.name.clone()).collect();
    assert_eq!(names, vec!["Lake", "lake (1)", "LAKE (2)"]);
}

#[test]
fn incoming_name_equal_to_issued_suffix_stays_distinct() {
    let mut net = Network::new("t");
    for (i, name) in ["Lake", "lake", "lake (1)", "LAKE (1)"].iter().enumerate() {
        net.add_node(Node::new(NodeId::new(-(i as i64) - 1), *name, 0.0, i as f64));
    }
    let stored: HashSet<String> = net.nodes().map(|n| n.name.to_lowercase()).collect();
    assert_eq!(stored.len(), 4);
}
