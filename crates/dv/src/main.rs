//! DV CLI - headless documentation viewer.
//!
//! Provides commands for:
//! - `render`: Render the page a fragment points at
//! - `menu`: Print the navigation menu of a doc set
//! - `search`: Search the pages of a doc set
//! - `projects`: List configured projects and versions

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CommonArgs, MenuArgs, ProjectsArgs, RenderArgs, SearchArgs};
use error::CliError;
use output::Output;

/// DV - Documentation viewer.
#[derive(Parser)]
#[command(name = "dv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the page a fragment points at.
    Render(RenderArgs),
    /// Print the navigation menu of a doc set.
    Menu(MenuArgs),
    /// Search the pages of a doc set.
    Search(SearchArgs),
    /// List configured projects and versions.
    Projects(ProjectsArgs),
}

impl Commands {
    fn common(&self) -> &CommonArgs {
        match self {
            Self::Render(args) => &args.common,
            Self::Menu(args) => &args.common,
            Self::Search(args) => &args.common,
            Self::Projects(args) => &args.common,
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    if let Commands::Projects(args) = command {
        return args.execute();
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        match command {
            Commands::Render(args) => args.execute().await,
            Commands::Menu(args) => args.execute().await,
            Commands::Search(args) => args.execute().await,
            Commands::Projects(args) => args.execute(),
        }
    })
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.common().verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
