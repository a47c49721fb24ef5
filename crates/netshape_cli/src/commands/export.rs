//! Export command implementation.

use netshape_app::{ExportOptions, Exporter, NetworkSession};
use netshape_core::{NetworkId, ScenarioId};
use netshape_gis::GeoJsonDriver;
use netshape_remote::FileRemote;
use serde::Serialize;
use std::path::Path;

/// One written layer.
#[derive(Debug, Serialize)]
pub struct LayerResult {
    /// Class label.
    pub label: String,
    /// Output file.
    pub path: String,
    /// Number of features.
    pub features: usize,
}

/// Runs the export command.
pub fn run(
    store: &Path,
    network_id: NetworkId,
    scenario_id: ScenarioId,
    output: &Path,
    options: ExportOptions,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let remote = FileRemote::open(store)?;
    let network = NetworkSession::new(&remote).load_network(network_id, scenario_id)?;
    let driver = GeoJsonDriver::new();
    let report = Exporter::new(&driver, options).export(&network, output)?;

    let layers: Vec<LayerResult> = report
        .layers
        .iter()
        .map(|layer| LayerResult {
            label: layer.label.clone(),
            path: layer.path.display().to_string(),
            features: layer.features,
        })
        .collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&layers)?);
        }
        _ => {
            println!("Exported network {} to {}", network.name, output.display());
            for layer in &layers {
                println!("  {:<24} {:>6} features  {}", layer.label, layer.features, layer.path);
            }
        }
    }

    Ok(())
}
