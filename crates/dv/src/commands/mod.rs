//! CLI command implementations.

mod host;
pub(crate) mod menu;
pub(crate) mod projects;
pub(crate) mod render;
pub(crate) mod search;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dv_config::{CliSettings, Config};
use dv_fetch::{Fetcher, HttpFetcher};
use dv_route::PageId;
use dv_site::{DocSetLoader, LoaderOptions, Registry};
use dv_viewer::{Navigated, ViewController, ViewerOptions};

pub(crate) use host::CaptureHost;
pub(crate) use menu::MenuArgs;
pub(crate) use projects::ProjectsArgs;
pub(crate) use render::RenderArgs;
pub(crate) use search::SearchArgs;

use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover docview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project shown for an empty fragment (overrides config).
    #[arg(short, long)]
    project: Option<String>,

    /// Enable verbose output (show load timing logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    /// Load configuration, applying `depth` to both menus when given.
    pub(crate) fn load_config(&self, depth: Option<u8>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            default_project: self.project.clone(),
            menu_depth: depth,
            api_menu_depth: depth,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// A controller driving a [`CaptureHost`].
pub(crate) type Viewer = ViewController<CaptureHost>;

/// Build a viewer over `config`, fetching content with `fetcher`.
pub(crate) fn viewer_with(config: &Config, fetcher: Arc<dyn Fetcher>) -> Viewer {
    let registry = Arc::new(Registry::from_config(config));
    let loader = DocSetLoader::new(registry, fetcher, LoaderOptions::from(&config.viewer));
    ViewController::new(
        Arc::new(loader),
        CaptureHost::default(),
        ViewerOptions::from(&config.viewer),
    )
}

pub(crate) fn viewer(config: &Config) -> Viewer {
    viewer_with(config, Arc::new(HttpFetcher::new()))
}

/// Navigate to `fragment`, or to the default page when absent.
///
/// Reports a corrected fragment on stderr.
pub(crate) async fn show(
    viewer: &Viewer,
    fragment: Option<&str>,
    output: &Output,
) -> Result<PageId, CliError> {
    match viewer.start(fragment).await? {
        Navigated::Shown(id) => {
            if let Some(last) = viewer.host().last_fragment() {
                output.info(&format!("Showing {last}"));
            }
            Ok(id)
        }
        Navigated::Superseded => Err(CliError::Validation(
            "Navigation was superseded".to_owned(),
        )),
    }
}
