//! Doc sets for docview: where they live, how they load and how they are
//! navigated.
//!
//! This crate provides:
//! - [`Registry`]: read-only catalog of projects and versions
//! - [`DocSetLoader`]: fetches, renders and caches whole doc sets
//! - [`Menu`]: navigation trees built from page headings
//! - [`search_pages`] and [`mark_occurrences`]: full-text search
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use dv_config::Config;
//! use dv_fetch::HttpFetcher;
//! use dv_route::{ContentType, DocSetId};
//! use dv_site::{DocSetLoader, LoaderOptions, Registry};
//!
//! let config = Config::load(None, None)?;
//! let registry = Arc::new(Registry::from_config(&config));
//! let loader = DocSetLoader::new(
//!     registry,
//!     Arc::new(HttpFetcher::new()),
//!     LoaderOptions::from(&config.viewer),
//! );
//!
//! let docset = loader.load(&DocSetId::new("Intern", "4")).await?;
//! let menu = docset.menu(ContentType::Docs);
//! # Ok(())
//! # }
//! ```

mod loader;
mod menu;
mod page;
mod registry;
mod scrub;
mod search;

pub use loader::{DocSetLoader, LoadError, LoadedDocSet, LoaderOptions};
pub use menu::{Menu, MenuNode};
pub use page::{RenderedPage, render_markdown_page};
pub use registry::{DEFAULT_BRANCH, DocSet, Registry, RegistryError};
pub use scrub::scrub;
pub use search::{MARK_ID_PREFIX, SearchHit, mark_occurrences, search_pages};
