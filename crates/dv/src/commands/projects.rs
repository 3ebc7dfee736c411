//! `dv projects` command implementation.

use clap::Args;
use dv_site::Registry;
use serde::Serialize;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the projects command.
#[derive(Args)]
pub(crate) struct ProjectsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct ProjectSummary {
    name: String,
    versions: Vec<String>,
    latest: Option<String>,
    next: Option<String>,
}

impl ProjectSummary {
    fn version_label(&self, version: &str) -> String {
        if self.latest.as_deref() == Some(version) {
            format!("{version} (latest)")
        } else if self.next.as_deref() == Some(version) {
            format!("{version} (next)")
        } else {
            version.to_owned()
        }
    }
}

impl ProjectsArgs {
    /// Execute the projects command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;
        let registry = Registry::from_config(&config);
        let projects = summaries(&registry);

        if self.common.json {
            output.result(&serde_json::to_string_pretty(&projects)?);
            return Ok(());
        }
        if projects.is_empty() {
            output.info("No projects configured");
        }
        for project in &projects {
            output.result_highlight(&project.name);
            for version in &project.versions {
                output.result(&format!("  {}", project.version_label(version)));
            }
        }
        Ok(())
    }
}

fn summaries(registry: &Registry) -> Vec<ProjectSummary> {
    registry
        .list_projects()
        .map(|name| ProjectSummary {
            name: name.to_owned(),
            versions: registry
                .list_versions(name)
                .map(|versions| versions.into_iter().map(str::to_owned).collect())
                .unwrap_or_default(),
            latest: registry.latest_version(name).ok().map(str::to_owned),
            next: registry.next_version(name).ok().flatten().map(str::to_owned),
        })
        .collect()
}
