//! Network to geometry layers.

use crate::error::{AppError, AppResult};
use crate::options::ExportOptions;
use netshape_core::schema::{feature_properties, partition, resolve_schema};
use netshape_core::{Feature, Geometry, LayerSchema, Network};
use netshape_gis::{GeometryKind, GisError, LayerDefn, LayerDriver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One written output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerReport {
    /// Class label.
    pub label: String,
    /// Output file.
    pub path: PathBuf,
    /// Number of features written.
    pub features: usize,
}

/// Outcome of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Written layers, node classes first.
    pub layers: Vec<LayerReport>,
}

impl ExportReport {
    /// Total number of features written.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.features).sum()
    }
}

/// Writes a network as one layer per entity class.
pub struct Exporter<'a> {
    driver: &'a dyn LayerDriver,
    options: ExportOptions,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter.
    pub fn new(driver: &'a dyn LayerDriver, options: ExportOptions) -> Self {
        Self { driver, options }
    }

    /// Output file for a class label.
    #[must_use]
    pub fn output_path(&self, dir: &Path, label: &str) -> PathBuf {
        dir.join(format!("{}.{}", label.replace(' ', "_"), self.driver.extension()))
    }

    /// Exports `network` into `dir`.
    ///
    /// Classes are written one after another, nodes first. A failing class
    /// stops the run; files of earlier classes stay in place.
    ///
    /// # Errors
    ///
    /// - [`AppError::ProjectionUnresolvable`] if the network has no CRS
    /// - ambiguous or colliding schemas from the resolver
    /// - [`GisError::OutputExists`] for an existing file without overwrite
    pub fn export(&self, network: &Network, dir: &Path) -> AppResult<ExportReport> {
        let epsg = network.epsg().ok_or_else(|| {
            AppError::projection_unresolvable(format!(
                "network `{}` has no coordinate reference system",
                network.name
            ))
        })?;
        self.driver.create_dir(dir)?;

        let schema_config = &self.options.schema;
        let mut report = ExportReport::default();

        for class in partition(network.nodes(), &schema_config.generic_node_label) {
            let schema = resolve_schema(&class, schema_config)?;
            let features = class.members.iter().map(|node| -> AppResult<Feature> {
                Ok(Feature {
                    geometry: Geometry::Point([node.x, node.y]),
                    properties: feature_properties(*node, &schema),
                })
            });
            report
                .layers
                .push(self.write_layer(dir, &schema, epsg, GeometryKind::Point, features)?);
        }

        for class in partition(network.links(), &schema_config.generic_link_label) {
            let schema = resolve_schema(&class, schema_config)?;
            let features = class.members.iter().map(|link| -> AppResult<Feature> {
                let geometry = match link.layout_geometry().and_then(Geometry::from_json) {
                    Some(geometry) => geometry,
                    None => {
                        let (start, end) = network.link_endpoints(link)?;
                        Geometry::segment([start.x, start.y], [end.x, end.y])
                    }
                };
                Ok(Feature {
                    geometry,
                    properties: feature_properties(*link, &schema),
                })
            });
            report
                .layers
                .push(self.write_layer(dir, &schema, epsg, GeometryKind::Line, features)?);
        }

        info!(
            dir = %dir.display(),
            layers = report.layers.len(),
            features = report.feature_count(),
            "export finished"
        );
        Ok(report)
    }

    fn write_layer<I>(
        &self,
        dir: &Path,
        schema: &LayerSchema,
        epsg: u32,
        geometry_kind: GeometryKind,
        features: I,
    ) -> AppResult<LayerReport>
    where
        I: Iterator<Item = AppResult<Feature>>,
    {
        let path = self.output_path(dir, &schema.label);
        if self.driver.exists(&path) {
            if !self.options.overwrite {
                return Err(GisError::OutputExists { path }.into());
            }
            debug!(path = %path.display(), "replacing existing output");
            self.driver.delete(&path)?;
        }

        let label = schema.label.clone();
        let defn = LayerDefn {
            name: label.clone(),
            epsg,
            geometry_kind,
            fields: schema.fields.clone(),
        };
        let mut writer = self.driver.create(&path, defn)?;
        for feature in features {
            writer.write(feature?)?;
        }
        let count = writer.finish()?;
        info!(layer = %label, path = %path.display(), features = count, "wrote layer");
        Ok(LayerReport {
            label,
            path,
            features: count,
        })
    }
}
