//! `dv search` command implementation.

use clap::Args;
use dv_site::SearchHit;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fragment naming the doc set and content type to search.
    fragment: String,

    /// Text to search for.
    term: String,
}

impl SearchArgs {
    /// Execute the search command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the doc set cannot be loaded.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;
        let viewer = super::viewer(&config);
        super::show(&viewer, Some(&self.fragment), &output).await?;

        let results = viewer.search_now(&self.term);
        if results.is_cleared() {
            output.warning(&format!(
                "Search terms need at least {} characters",
                config.viewer.search_min_length
            ));
            return Ok(());
        }

        if self.common.json {
            output.result(&serde_json::to_string_pretty(&results.hits)?);
            return Ok(());
        }
        if results.hits.is_empty() {
            output.info("No matches");
        }
        for hit in &results.hits {
            output.result_highlight(&hit_title(hit));
            output.result(&format!("  {}", hit.snippet));
            output.result_dim(&format!("  {}", hit.href));
        }
        Ok(())
    }
}

/// Page title, followed by the section title when they differ.
fn hit_title(hit: &SearchHit) -> String {
    match &hit.section_title {
        Some(section) if *section != hit.page_title => {
            format!("{} › {section}", hit.page_title)
        }
        _ => hit.page_title.clone(),
    }
}
