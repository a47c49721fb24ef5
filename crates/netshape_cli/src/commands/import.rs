//! Import command implementation.

use netshape_app::{ImportOptions, ImportReport, Importer};
use netshape_gis::{GeoJsonDriver, WktAuthorityLookup};
use netshape_remote::FileRemote;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Import result.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    /// Stored network identity, absent on a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<i64>,
    /// Stored network name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// Containing project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    /// Default scenario identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<i64>,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of links.
    pub link_count: usize,
    /// EPSG code of the network.
    pub epsg: Option<u32>,
}

impl From<&ImportReport> for ImportResult {
    fn from(report: &ImportReport) -> Self {
        let summary = report.summary.as_ref();
        Self {
            network_id: summary.map(|s| s.id.as_i64()),
            network_name: summary.map(|s| s.name.clone()),
            project_id: summary.map(|s| s.project_id.as_i64()),
            scenario_id: summary.and_then(|s| s.scenarios.first()).map(|s| s.id.as_i64()),
            node_count: report.network.node_count(),
            link_count: report.network.link_count(),
            epsg: report.network.epsg(),
        }
    }
}

/// Runs the import command.
pub fn run(
    store: &Path,
    nodes: &[PathBuf],
    links: &[PathBuf],
    options: ImportOptions,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let remote = FileRemote::open(store)?;
    let driver = GeoJsonDriver::new();
    let lookup = WktAuthorityLookup::new();
    let report = Importer::new(&remote, &driver, &lookup, options).import(nodes, links)?;
    let result = ImportResult::from(&report);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text(&result);
        }
    }

    Ok(())
}

fn print_text(result: &ImportResult) {
    match (result.network_id, &result.network_name) {
        (Some(id), Some(name)) => println!("Saved network {id}: {name}"),
        _ => println!("Dry run, nothing saved"),
    }
    if let Some(project) = result.project_id {
        println!("  Project:  {project}");
    }
    if let Some(scenario) = result.scenario_id {
        println!("  Scenario: {scenario}");
    }
    println!("  Nodes:    {}", result.node_count);
    println!("  Links:    {}", result.link_count);
    match result.epsg {
        Some(code) => println!("  CRS:      EPSG:{code}"),
        None => println!("  CRS:      unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netshape_remote::RemoteClient;
    use netshape_testkit::{sample_links, sample_nodes, TestDir};

    #[test]
    fn import_then_export_through_store_file() {
        let dir = TestDir::new();
        let links = dir.write_layer("canals", Some(2056), &sample_links());
        let nodes = dir.write_layer("locks", Some(2056), &sample_nodes());
        let store = dir.join("store.json");

        run(&store, &[nodes], &[links], ImportOptions::new(), "json").unwrap();

        let remote = FileRemote::open(&store).unwrap();
        let project = remote.get_projects().unwrap().remove(0);
        let network = remote.get_networks(project.id.unwrap()).unwrap().remove(0);
        assert_eq!(network.scenarios.len(), 1);

        let out = dir.join("layers");
        crate::commands::export::run(
            &store,
            network.id,
            network.scenarios[0].id,
            &out,
            netshape_app::ExportOptions::new(),
            "text",
        )
        .unwrap();
        assert!(out.join("Generic_node.geojson").exists());
        assert!(out.join("Generic_link.geojson").exists());
    }

    #[test]
    fn dry_run_leaves_no_store() {
        let dir = TestDir::new();
        let links = dir.write_layer("canals", Some(2056), &sample_links());
        let store = dir.join("store.json");
        run(&store, &[], &[links], ImportOptions::new().dry_run(), "text").unwrap();
        assert!(!store.exists());
    }
}
