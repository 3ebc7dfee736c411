//! `dv menu` command implementation.

use clap::Args;
use dv_route::PageId;
use dv_site::Menu;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the menu command.
#[derive(Args)]
pub(crate) struct MenuArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fragment whose doc set and content type to list (default: first page).
    fragment: Option<String>,

    /// Deepest heading level listed (overrides config).
    #[arg(short, long)]
    depth: Option<u8>,
}

impl MenuArgs {
    /// Execute the menu command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the page cannot be shown.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(self.depth)?;
        let viewer = super::viewer(&config);
        let id = super::show(&viewer, self.fragment.as_deref(), &output).await?;

        let menu = viewer
            .host()
            .menu()
            .ok_or_else(|| CliError::Validation("No menu was displayed".to_owned()))?;

        if self.common.json {
            output.result(&serde_json::to_string_pretty(&menu)?);
            return Ok(());
        }
        for (line, active) in menu_lines(&menu, &id) {
            if active {
                output.result_highlight(&line);
            } else {
                output.result(&line);
            }
        }
        Ok(())
    }
}

/// One indented line per node, flagging the node for `active`.
fn menu_lines(menu: &Menu, active: &PageId) -> Vec<(String, bool)> {
    let active_href = menu.find(active).map(|node| node.href.as_str());
    menu.iter()
        .map(|node| {
            let indent = "  ".repeat(usize::from(node.level.saturating_sub(1)));
            let line = format!("{indent}{}  {}", node.title, node.href);
            (line, active_href == Some(node.href.as_str()))
        })
        .collect()
}
