//! Hooks through which the controller updates the display.

use dv_route::PageId;
use dv_site::{Menu, RenderedPage, SearchHit};

use crate::controller::ViewError;

/// Contents of the project and version selectors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selectors {
    pub projects: Vec<String>,
    pub project: String,
    pub versions: Vec<String>,
    pub version: String,
    pub latest: Option<String>,
    pub next: Option<String>,
}

/// Results shown in the search panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// The active term, `None` when the panel was cleared.
    pub term: Option<String>,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.term.is_none()
    }
}

/// The display driven by a [`ViewController`](crate::ViewController).
///
/// Every method is a synchronous update of visible state. The controller
/// never holds its own locks while calling into the host.
pub trait ViewHost: Send + Sync {
    /// Rewrite the URL fragment without triggering navigation.
    fn set_fragment(&self, fragment: &str);

    /// Replace the content pane with `page`.
    fn mount_content(&self, page: &RenderedPage, id: &PageId);

    /// Replace the menu pane and highlight `active`.
    fn mount_menu(&self, menu: &Menu, active: &PageId);

    /// Move the menu highlight to `active`.
    fn highlight_menu(&self, active: &PageId);

    /// Scroll the content pane to `section`, or to the top.
    fn scroll_to(&self, section: Option<&str>);

    /// Present a dismissible error.
    fn show_error(&self, error: &ViewError);

    fn update_selectors(&self, selectors: &Selectors);

    fn show_search_results(&self, results: &SearchResults);
}
