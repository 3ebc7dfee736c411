//! A [`ViewHost`] that keeps what would be displayed.

use std::sync::Mutex;

use dv_route::PageId;
use dv_site::{Menu, RenderedPage};
use dv_viewer::{SearchResults, Selectors, ViewError, ViewHost};

/// Captures the mounted page and menu instead of drawing them.
#[derive(Default)]
pub(crate) struct CaptureHost {
    page: Mutex<Option<RenderedPage>>,
    menu: Mutex<Option<Menu>>,
    fragment: Mutex<Option<String>>,
}

impl CaptureHost {
    /// The mounted page.
    pub(crate) fn page(&self) -> Option<RenderedPage> {
        self.page.lock().unwrap().clone()
    }

    /// The mounted menu.
    pub(crate) fn menu(&self) -> Option<Menu> {
        self.menu.lock().unwrap().clone()
    }

    /// The last fragment written by the controller.
    pub(crate) fn last_fragment(&self) -> Option<String> {
        self.fragment.lock().unwrap().clone()
    }
}

impl ViewHost for CaptureHost {
    fn set_fragment(&self, fragment: &str) {
        tracing::info!(fragment, "Fragment rewritten");
        *self.fragment.lock().unwrap() = Some(fragment.to_owned());
    }

    fn mount_content(&self, page: &RenderedPage, _id: &PageId) {
        *self.page.lock().unwrap() = Some(page.clone());
    }

    fn mount_menu(&self, menu: &Menu, _active: &PageId) {
        *self.menu.lock().unwrap() = Some(menu.clone());
    }

    fn highlight_menu(&self, _active: &PageId) {}

    fn scroll_to(&self, _section: Option<&str>) {}

    fn show_error(&self, error: &ViewError) {
        tracing::debug!(error = %error, "View error");
    }

    fn update_selectors(&self, _selectors: &Selectors) {}

    fn show_search_results(&self, results: &SearchResults) {
        tracing::debug!(hit_count = results.hits.len(), "Search results");
    }
}
