//! Navigation and display state for docview.
//!
//! [`ViewController`] turns URL fragment changes, scrolling, selector changes
//! and search input into updates of a display implementing [`ViewHost`].
//!
//! # Example
//!
//! ```no_run
//! # async fn run(host: impl dv_viewer::ViewHost, loader: std::sync::Arc<dv_site::DocSetLoader>)
//! # -> Result<(), dv_viewer::ViewError> {
//! use dv_viewer::{HashSource, ViewController, ViewerOptions};
//!
//! let controller = ViewController::new(loader, host, ViewerOptions::default());
//! controller.start(None).await?;
//! controller.navigate("#Intern/4/docs/README.md/setup", HashSource::User).await?;
//! # Ok(())
//! # }
//! ```

mod controller;
mod debounce;
mod host;
mod scroll;

pub use controller::{HashSource, Navigated, ViewController, ViewError, ViewState, ViewerOptions};
pub use debounce::Debouncer;
pub use host::{SearchResults, Selectors, ViewHost};
pub use scroll::{HeadingOffset, section_at};
