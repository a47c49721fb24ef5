//! End-to-end import and export runs.

use netshape_app::{
    AppError, ExportOptions, Exporter, ImportOptions, Importer, NetworkSession, ProjectTree,
    SaveNames, SCENARIO_NAME,
};
use netshape_core::{AttrValue, CoreError, HasAttributes, MatchPolicy, Network, ProjectId};
use netshape_gis::{GeoJsonDriver, GisError, Layer, MemoryDriver, WktAuthorityLookup};
use netshape_remote::{MemoryRemote, Project, RemoteClient, RemoteError};
use netshape_testkit::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

fn dry_import(driver: &MemoryDriver, nodes: &[&str], links: &[&str]) -> Result<Network, AppError> {
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    Importer::new(&remote, driver, &lookup, ImportOptions::new().dry_run())
        .import(&paths(nodes), &paths(links))
        .map(|report| report.network)
}

#[test]
fn create_mode_round_trip() {
    let dir = TestDir::new();
    let links = dir.write_layer("canals", Some(2056), &sample_links());
    let remote = seeded_remote();
    let driver = GeoJsonDriver::new();
    let lookup = WktAuthorityLookup::new();

    let report = Importer::new(&remote, &driver, &lookup, ImportOptions::new())
        .import(&[], &[links])
        .unwrap();
    assert_eq!(report.network.node_count(), 4);
    assert_eq!(report.network.link_count(), 3);

    let summary = report.summary.unwrap();
    assert_eq!(summary.name, "Network imported from shapefile (canals.geojson)");
    assert_eq!(summary.node_count, 4);
    assert_eq!(summary.link_count, 3);
    assert_eq!(summary.scenarios.len(), 1);
    assert_eq!(summary.scenarios[0].name, SCENARIO_NAME);

    let loaded = NetworkSession::new(&remote)
        .load_network(summary.id, summary.scenarios[0].id)
        .unwrap();
    assert_eq!(loaded.epsg(), Some(2056));
    let mut node_names: Vec<_> = loaded.nodes().map(|n| n.name.clone()).collect();
    node_names.sort();
    assert_eq!(node_names, ["Node 1", "Node 2", "Node 3", "Node 4"]);
    let mut link_names: Vec<_> = loaded.links().map(|l| l.name.clone()).collect();
    link_names.sort();
    assert_eq!(link_names, ["Link 2", "Link 3", "Upper reach"]);

    let out = dir.join("out");
    let export = Exporter::new(&driver, ExportOptions::new())
        .export(&loaded, &out)
        .unwrap();
    let labels: Vec<_> = export.layers.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, ["Generic node", "Generic link"]);
    assert_eq!(export.feature_count(), 7);

    let doc = dir.read_json(&out.join("Generic_link.geojson"));
    assert_eq!(doc["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::2056");
    let fields: Vec<_> = doc["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["name", "depth", "width"]);

    let features = doc["features"].as_array().unwrap();
    let upper = features
        .iter()
        .find(|f| f["properties"]["name"] == "Upper reach")
        .unwrap();
    assert_eq!(upper["geometry"]["type"], "LineString");
    assert_eq!(upper["geometry"]["coordinates"].as_array().unwrap().len(), 3);
    assert_eq!(upper["properties"]["depth"], 2.5);
    assert_eq!(upper["properties"]["width"], 12.0);

    let third = features
        .iter()
        .find(|f| f["properties"]["name"] == "Link 3")
        .unwrap();
    assert!(third["properties"]["depth"].is_null());
    assert!(third["properties"]["width"].is_null());
}

#[test]
fn load_joins_scenario_values() {
    let driver = sample_driver(Some(2056));
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    let summary = Importer::new(&remote, &driver, &lookup, ImportOptions::new())
        .import(&paths(&["nodes.geojson"]), &paths(&["links.geojson"]))
        .unwrap()
        .summary
        .unwrap();

    let loaded = NetworkSession::new(&remote)
        .load_network(summary.id, summary.scenarios[0].id)
        .unwrap();
    let upper = loaded.links().find(|l| l.name == "Upper reach").unwrap();
    assert_eq!(
        upper.attribute("depth").unwrap().value,
        Some(AttrValue::Scalar(2.5))
    );
    assert!(upper.attribute("depth").unwrap().attr_id.is_some());

    let third = loaded.links().find(|l| l.name == "Link 3").unwrap();
    assert!(third.attribute("depth").unwrap().is_var());
    assert!(loaded.nodes().all(|n| !n.id.is_placeholder()));
}

#[test]
fn missing_scenario_is_not_found() {
    let driver = sample_driver(Some(2056));
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    let summary = Importer::new(&remote, &driver, &lookup, ImportOptions::new())
        .import(&[], &paths(&["links.geojson"]))
        .unwrap()
        .summary
        .unwrap();

    let err = NetworkSession::new(&remote)
        .load_network(summary.id, netshape_core::ScenarioId::new(999))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Remote(RemoteError::NotFound { kind: "scenario", .. })
    ));
}

#[test]
fn match_mode_uses_node_layer() {
    let driver = sample_driver(Some(2056));
    let network = dry_import(&driver, &["nodes.geojson"], &["links.geojson"]).unwrap();
    assert_eq!(network.node_count(), 4);
    assert_eq!(network.link_count(), 3);

    let upper = network.links().find(|l| l.name == "Upper reach").unwrap();
    let (start, end) = network.link_endpoints(upper).unwrap();
    assert_eq!(start.name, "Weir");
    assert_eq!(end.name, "Junction");
}

#[test]
fn match_mode_tolerates_rounding_noise() {
    let driver = MemoryDriver::new();
    driver.insert(
        "nodes.geojson",
        Layer::new("nodes", Some(2056), vec![point(1.0, 1.0), point(2.0, 2.0)]),
    );
    driver.insert(
        "links.geojson",
        Layer::new(
            "links",
            Some(2056),
            vec![line(&[[1.000_000_000_1, 1.0], [2.0, 1.999_999_999_9]])],
        ),
    );
    let network = dry_import(&driver, &["nodes.geojson"], &["links.geojson"]).unwrap();
    assert_eq!(network.node_count(), 2);
    assert_eq!(network.link_count(), 1);
}

#[test]
fn unmatched_endpoint_saves_nothing() {
    let driver = sample_driver(Some(2056));
    driver.insert(
        "stray.geojson",
        Layer::new("stray", Some(2056), vec![line(&[[0.0, 0.0], [500.0, 500.0]])]),
    );
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    let options = ImportOptions::new().match_policy(MatchPolicy::new().min_decimals(2));

    let err = Importer::new(&remote, &driver, &lookup, options)
        .import(&paths(&["nodes.geojson"]), &paths(&["stray.geojson"]))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Core(CoreError::UnresolvedCoordinate { min_decimals: 2, .. })
    ));
    assert_eq!(remote.network_count(), 0);
    assert!(remote.get_projects().unwrap().is_empty());
}

#[test]
fn point_in_link_layer_is_rejected() {
    let driver = MemoryDriver::new();
    driver.insert("links.geojson", Layer::new("links", None, vec![point(0.0, 0.0)]));
    let err = dry_import(&driver, &[], &["links.geojson"]).unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::InvalidGeometry { .. })));
}

#[test]
fn unreadable_source_fails() {
    let driver = MemoryDriver::new();
    let err = dry_import(&driver, &[], &["missing.geojson"]).unwrap_err();
    assert!(matches!(err, AppError::Gis(GisError::SourceUnreadable { .. })));
}

#[test]
fn dry_run_persists_nothing() {
    let driver = sample_driver(Some(2056));
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    let report = Importer::new(&remote, &driver, &lookup, ImportOptions::new().dry_run())
        .import(&[], &paths(&["links.geojson"]))
        .unwrap();
    assert!(report.summary.is_none());
    assert!(report.network.network_id.is_none());
    assert_eq!(remote.network_count(), 0);
}

#[test]
fn saves_into_existing_project() {
    let driver = sample_driver(Some(2056));
    let remote = MemoryRemote::new();
    let project = remote.add_project(&Project::new("Thur")).unwrap();
    let lookup = WktAuthorityLookup::new();
    let options = ImportOptions::new()
        .project_id(project.id.unwrap())
        .network_name("Thur canals");

    let report = Importer::new(&remote, &driver, &lookup, options)
        .import(&[], &paths(&["links.geojson"]))
        .unwrap();
    let summary = report.summary.unwrap();
    assert_eq!(summary.name, "Thur canals");
    assert_eq!(Some(summary.project_id), project.id);
    assert_eq!(report.network.network_id, Some(summary.id));

    // depth and width were unknown to the empty remote
    let names: Vec<_> = remote
        .get_all_attributes()
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert!(names.contains(&"depth".to_string()));
    assert!(names.contains(&"width".to_string()));
}

#[test]
fn unknown_project_is_rejected() {
    let driver = sample_driver(Some(2056));
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    let options = ImportOptions::new().project_id(ProjectId::new(42));
    let err = Importer::new(&remote, &driver, &lookup, options)
        .import(&[], &paths(&["links.geojson"]))
        .unwrap_err();
    assert!(matches!(err, AppError::Remote(RemoteError::NotFound { .. })));
    assert_eq!(remote.network_count(), 0);
}

#[test]
fn projection_from_prj_sidecar() {
    let dir = TestDir::new();
    let links = dir.write_layer("canals", None, &sample_links());
    dir.write_prj(&links, UTM32_WKT);
    let network = Importer::new(
        &seeded_remote(),
        &GeoJsonDriver::new(),
        &WktAuthorityLookup::new(),
        ImportOptions::new().dry_run(),
    )
    .import(&[], &[links])
    .unwrap()
    .network;
    assert_eq!(network.epsg(), Some(25832));
}

#[test]
fn first_layer_with_crs_wins() {
    let driver = MemoryDriver::new();
    driver.insert("nodes.geojson", Layer::new("nodes", None, sample_nodes()));
    driver.insert("links.geojson", Layer::new("links", Some(2056), sample_links()));
    driver.insert("more.geojson", Layer::new("more", Some(4326), Vec::new()));
    let network =
        dry_import(&driver, &["nodes.geojson"], &["links.geojson", "more.geojson"]).unwrap();
    assert_eq!(network.epsg(), Some(2056));
}

#[test]
fn export_without_crs_fails() {
    let driver = sample_driver(None);
    let network = dry_import(&driver, &[], &["links.geojson"]).unwrap();
    assert_eq!(network.epsg(), None);

    let err = Exporter::new(&driver, ExportOptions::new())
        .export(&network, Path::new("out"))
        .unwrap_err();
    assert!(matches!(err, AppError::ProjectionUnresolvable { .. }));
}

#[test]
fn ambiguous_attribute_type_fails_export() {
    let driver = MemoryDriver::new();
    driver.insert(
        "links.geojson",
        Layer::new(
            "links",
            Some(2056),
            vec![
                line(&[[0.0, 0.0], [1.0, 0.0]]).with_property("depth", 1.5),
                line(&[[1.0, 0.0], [2.0, 0.0]]).with_property("depth", "deep"),
            ],
        ),
    );
    let network = dry_import(&driver, &[], &["links.geojson"]).unwrap();

    let err = Exporter::new(&driver, ExportOptions::new())
        .export(&network, Path::new("out"))
        .unwrap_err();
    match err {
        AppError::Core(CoreError::AmbiguousSchema { class, attribute }) => {
            assert_eq!(class, "Generic link");
            assert_eq!(attribute, "depth");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn second_export_requires_overwrite() {
    let dir = TestDir::new();
    let driver = sample_driver(Some(2056));
    let network = dry_import(&driver, &[], &["links.geojson"]).unwrap();
    let disk = GeoJsonDriver::new();
    let out = dir.join("out");

    Exporter::new(&disk, ExportOptions::new())
        .export(&network, &out)
        .unwrap();
    let node_file = out.join("Generic_node.geojson");
    let before = fs::read_to_string(&node_file).unwrap();

    let err = Exporter::new(&disk, ExportOptions::new())
        .export(&network, &out)
        .unwrap_err();
    assert!(matches!(err, AppError::Gis(GisError::OutputExists { .. })));
    assert_eq!(fs::read_to_string(&node_file).unwrap(), before);

    let report = Exporter::new(&disk, ExportOptions::new().overwrite(true))
        .export(&network, &out)
        .unwrap();
    assert_eq!(report.layers.len(), 2);
}

#[test]
fn tree_lists_saved_networks() {
    let driver = sample_driver(Some(2056));
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    Importer::new(
        &remote,
        &driver,
        &lookup,
        ImportOptions::new().project_name("Thur"),
    )
    .import(&[], &paths(&["links.geojson"]))
    .unwrap();

    let tree = ProjectTree::fetch(&remote).unwrap();
    assert_eq!(tree.projects.len(), 1);
    assert_eq!(tree.projects[0].project.name, "Thur");
    assert_eq!(tree.projects[0].networks.len(), 1);

    let text = tree.render(false);
    assert!(text.contains("Network imported from shapefile (links.geojson)"));
    assert!(text.contains(SCENARIO_NAME));
}

#[test]
fn names_shaped_like_suffixes_still_save() {
    let driver = MemoryDriver::new();
    driver.insert(
        "nodes.geojson",
        Layer::new(
            "nodes",
            Some(2056),
            vec![
                point(0.0, 0.0).with_property("name", "Lake"),
                point(1.0, 0.0).with_property("name", "lake (1)"),
                point(2.0, 0.0).with_property("name", "lake"),
            ],
        ),
    );
    driver.insert(
        "links.geojson",
        Layer::new("links", Some(2056), vec![line(&[[0.0, 0.0], [2.0, 0.0]])]),
    );
    let remote = seeded_remote();
    let lookup = WktAuthorityLookup::new();
    let report = Importer::new(&remote, &driver, &lookup, ImportOptions::new())
        .import(&paths(&["nodes.geojson"]), &paths(&["links.geojson"]))
        .unwrap();

    let names: Vec<_> = report.network.nodes().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["Lake", "lake (1)", "lake (2)"]);
    assert_eq!(report.summary.unwrap().node_count, 3);
}

#[test]
fn network_attributes_survive_save_and_load() {
    let driver = sample_driver(Some(2056));
    let remote = seeded_remote();
    let mut network = dry_import(&driver, &[], &["links.geojson"]).unwrap();
    network.set_attribute("catchment", Some(AttrValue::Scalar(48.5)));
    network.set_attribute("operator", None);

    let session = NetworkSession::new(&remote);
    network.set_catalog(session.load_catalog().unwrap());
    let summary = session
        .save_network(&mut network, &SaveNames::default())
        .unwrap();
    let loaded = session
        .load_network(summary.id, summary.scenarios[0].id)
        .unwrap();

    assert_eq!(
        loaded.attribute("catchment").unwrap().value,
        Some(AttrValue::Scalar(48.5))
    );
    assert!(loaded.attribute("operator").unwrap().is_var());
}

#[test]
fn rejected_network_creates_no_project() {
    let driver = sample_driver(Some(2056));
    let remote = MemoryRemote::new();
    let mut network = dry_import(&driver, &[], &["links.geojson"]).unwrap();
    let ids: Vec<_> = network.nodes().map(|n| n.id).collect();
    let clash = network.node(ids[0]).unwrap().name.to_uppercase();
    network.node_mut(ids[1]).unwrap().name = clash;

    let err = NetworkSession::new(&remote)
        .save_network(&mut network, &SaveNames::default())
        .unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::InvalidPayload { .. })));
    assert!(remote.get_projects().unwrap().is_empty());
    assert!(remote.get_all_attributes().unwrap().is_empty());
    assert!(network.project_id.is_none());
}
