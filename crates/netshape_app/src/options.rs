//! Import and export options.

use netshape_core::{MatchPolicy, ProjectId, SchemaConfig};

/// Options of an import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Name of the stored network. Derived from the source files if unset.
    pub network_name: Option<String>,
    /// Name of a project created for the network. Timestamped if unset.
    pub project_name: Option<String>,
    /// Existing project to store the network in.
    pub project_id: Option<ProjectId>,
    /// Endpoint matching precision when node sources are given.
    pub match_policy: MatchPolicy,
    /// Whether to save the network to the remote.
    pub persist: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            network_name: None,
            project_name: None,
            project_id: None,
            match_policy: MatchPolicy::default(),
            persist: true,
        }
    }
}

impl ImportOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network name.
    #[must_use]
    pub fn network_name(mut self, name: impl Into<String>) -> Self {
        self.network_name = Some(name.into());
        self
    }

    /// Sets the name of a newly created project.
    #[must_use]
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Stores the network in an existing project.
    #[must_use]
    pub fn project_id(mut self, id: ProjectId) -> Self {
        self.project_id = Some(id);
        self
    }

    /// Sets the endpoint matching policy.
    #[must_use]
    pub fn match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Skips saving; the run only builds the network.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.persist = false;
        self
    }
}

/// Options of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Replace existing output files.
    pub overwrite: bool,
    /// Field layout settings.
    pub schema: SchemaConfig,
}

impl ExportOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows replacing existing output files.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the field layout settings.
    #[must_use]
    pub fn schema(mut self, schema: SchemaConfig) -> Self {
        self.schema = schema;
        self
    }
}
