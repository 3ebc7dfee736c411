//! `dv render` command implementation.

use clap::Args;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fragment to render, e.g. `#Intern/4/docs/README.md` (default: first page).
    fragment: Option<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the page cannot be shown.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;
        let viewer = super::viewer(&config);
        super::show(&viewer, self.fragment.as_deref(), &output).await?;

        let page = viewer
            .host()
            .page()
            .ok_or_else(|| CliError::Validation("No page was displayed".to_owned()))?;
        for warning in &page.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        if self.common.json {
            output.result(&serde_json::to_string_pretty(&page)?);
        } else {
            output.result(&page.html);
        }
        Ok(())
    }
}
