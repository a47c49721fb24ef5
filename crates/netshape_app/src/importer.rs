//! Geometry layers to remote network.

use crate::error::AppResult;
use crate::options::ImportOptions;
use crate::session::{NetworkSession, SaveNames};
use netshape_core::{Network, NodeMode, Reconciler};
use netshape_gis::{Layer, LayerDriver, ProjectionLookup};
use netshape_remote::{NetworkSummary, RemoteClient};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of an import run.
#[derive(Debug)]
pub struct ImportReport {
    /// The assembled network.
    pub network: Network,
    /// Remote summary, absent on a dry run.
    pub summary: Option<NetworkSummary>,
}

/// Builds a network from node and link layers and saves it.
pub struct Importer<'a> {
    client: &'a dyn RemoteClient,
    driver: &'a dyn LayerDriver,
    lookup: &'a dyn ProjectionLookup,
    options: ImportOptions,
}

fn source_label(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'a> Importer<'a> {
    /// Creates an importer.
    pub fn new(
        client: &'a dyn RemoteClient,
        driver: &'a dyn LayerDriver,
        lookup: &'a dyn ProjectionLookup,
        options: ImportOptions,
    ) -> Self {
        Self {
            client,
            driver,
            lookup,
            options,
        }
    }

    /// Runs the import.
    ///
    /// Node sources are read first; if there are any, every link endpoint
    /// must match one of their nodes. Without node sources, nodes are
    /// created at link endpoints.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable source, invalid feature or unresolved
    /// endpoint, or if the remote rejects the network.
    pub fn import(&self, node_sources: &[PathBuf], link_sources: &[PathBuf]) -> AppResult<ImportReport> {
        let mut network = self.ingest_only(node_sources, link_sources)?;
        let summary = if self.options.persist {
            let names = SaveNames {
                network_name: self.options.network_name.clone(),
                project_name: self.options.project_name.clone(),
            };
            Some(NetworkSession::new(self.client).save_network(&mut network, &names)?)
        } else {
            info!("dry run, network not saved");
            None
        };
        Ok(ImportReport { network, summary })
    }

    /// Builds the network without saving it.
    ///
    /// # Errors
    ///
    /// Same as [`Importer::import`], except for the save step.
    pub fn ingest_only(&self, node_sources: &[PathBuf], link_sources: &[PathBuf]) -> AppResult<Network> {
        let mut network = Network::new(source_label(link_sources));
        network.project_id = self.options.project_id;
        network.set_catalog(NetworkSession::new(self.client).load_catalog()?);

        let mode = if node_sources.is_empty() {
            NodeMode::Create
        } else {
            NodeMode::Match(self.options.match_policy)
        };

        for path in node_sources {
            for layer in self.driver.open(path)?.into_layers() {
                self.resolve_projection(&mut network, path, &layer)?;
                info!(path = %path.display(), layer = %layer.name, features = layer.feature_count(), "reading nodes");
                let mut reconciler = Reconciler::new(&mut network, mode);
                for feature in &layer.features {
                    reconciler.add_node_feature(feature)?;
                }
            }
        }

        for path in link_sources {
            for layer in self.driver.open(path)?.into_layers() {
                self.resolve_projection(&mut network, path, &layer)?;
                info!(path = %path.display(), layer = %layer.name, features = layer.feature_count(), "reading links");
                let mut reconciler = Reconciler::new(&mut network, mode);
                for feature in &layer.features {
                    reconciler.add_link_feature(feature)?;
                }
            }
        }

        info!(
            nodes = network.node_count(),
            links = network.link_count(),
            epsg = ?network.epsg(),
            "network assembled"
        );
        Ok(network)
    }

    /// Sets the network's CRS from `layer` if it is still unknown.
    ///
    /// Tries the layer's embedded code, then the `.prj` sidecar through the
    /// lookup collaborator. Every fallback is logged; none is fatal.
    fn resolve_projection(&self, network: &mut Network, path: &Path, layer: &Layer) -> AppResult<()> {
        if network.epsg().is_some() {
            return Ok(());
        }
        if let Some(code) = layer.epsg {
            network.set_epsg(Some(code));
            return Ok(());
        }
        let Some(wkt) = self.driver.read_sidecar(path, "prj")? else {
            warn!(path = %path.display(), "no projection information, coordinate reference system left unset");
            return Ok(());
        };
        match self.lookup.lookup(&wkt) {
            Ok(Some(found)) => {
                if !found.exact {
                    warn!(path = %path.display(), candidates = ?found.codes, "no unique projection match, using the first candidate");
                }
                network.set_epsg(found.best());
            }
            Ok(None) => {
                warn!(path = %path.display(), "projection not recognized, coordinate reference system left unset");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "projection lookup failed, coordinate reference system left unset");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_file_names() {
        let paths = vec![PathBuf::from("/data/rivers.geojson"), PathBuf::from("canals.geojson")];
        assert_eq!(source_label(&paths), "rivers.geojson, canals.geojson");
        assert_eq!(source_label(&[]), "");
    }
}
