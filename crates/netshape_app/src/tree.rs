//! Project, network and scenario listing.

use crate::error::AppResult;
use netshape_remote::{NetworkBrief, Project, RemoteClient};
use std::fmt::Write;

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

/// A project with its networks.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// The project.
    pub project: Project,
    /// Its networks.
    pub networks: Vec<NetworkBrief>,
}

/// Everything stored on a remote, as a tree.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    /// Projects ordered by identity.
    pub projects: Vec<ProjectEntry>,
}

impl ProjectTree {
    /// Fetches the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails.
    pub fn fetch(client: &dyn RemoteClient) -> AppResult<Self> {
        let mut projects = Vec::new();
        for project in client.get_projects()? {
            let Some(id) = project.id else { continue };
            let networks = client.get_networks(id)?;
            projects.push(ProjectEntry { project, networks });
        }
        projects.sort_by_key(|entry| entry.project.id);
        Ok(Self { projects })
    }

    /// Renders one line per project, network and scenario.
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        let (pr, ne, sc, end) = if color {
            (BOLD, GREEN, BLUE, RESET)
        } else {
            ("", "", "", "")
        };
        let mut out = String::new();
        for entry in &self.projects {
            let pid = entry.project.id.map_or(0, |id| id.as_i64());
            let _ = writeln!(out, "{pr}P {pid:3} {}{end}", entry.project.name);
            for network in &entry.networks {
                let _ = writeln!(
                    out,
                    "{ne}N{end}   \u{2514}\u{2500}{ne}{:2} {}{end}",
                    network.id.as_i64(),
                    network.name
                );
                for scenario in &network.scenarios {
                    let _ = writeln!(
                        out,
                        "{sc}S{end}      \u{2514}\u{2500}{sc}{:2} {}{end}",
                        scenario.id.as_i64(),
                        scenario.name
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netshape_core::{NetworkId, ProjectId, ScenarioId};
    use netshape_remote::ScenarioBrief;

    fn tree() -> ProjectTree {
        let mut project = Project::new("Thur");
        project.id = Some(ProjectId::new(1));
        ProjectTree {
            projects: vec![ProjectEntry {
                project,
                networks: vec![NetworkBrief {
                    id: NetworkId::new(2),
                    name: "Rivers".into(),
                    scenarios: vec![ScenarioBrief {
                        id: ScenarioId::new(9),
                        name: "Baseline".into(),
                    }],
                }],
            }],
        }
    }

    #[test]
    fn plain_rendering() {
        let text = tree().render(false);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "P   1 Thur");
        assert_eq!(lines[1], "N   └─ 2 Rivers");
        assert_eq!(lines[2], "S      └─ 9 Baseline");
    }

    #[test]
    fn colored_rendering_wraps_names() {
        let text = tree().render(true);
        assert!(text.starts_with("\x1b[1mP   1 Thur\x1b[0m"));
        assert!(text.contains("\x1b[92m 2 Rivers\x1b[0m"));
    }
}
