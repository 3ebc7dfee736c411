//! Mapping a scroll position to the section being read.

use dv_route::PageId;

/// Position of a heading inside the content pane, in pixels from its top.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingOffset {
    pub id: String,
    pub top: f64,
}

impl HeadingOffset {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self { id: id.into(), top }
    }
}

/// A scroll event as recorded by the controller.
#[derive(Clone, Debug)]
pub(crate) struct ScrollUpdate {
    /// Page that was displayed when the event fired.
    pub page: PageId,
    pub scroll_top: f64,
    pub headings: Vec<HeadingOffset>,
}

/// Section at the top of the viewport.
///
/// Picks the last heading at or above `scroll_top`. Headings must be in
/// document order. Returns `None` above the first heading.
#[must_use]
pub fn section_at(headings: &[HeadingOffset], scroll_top: f64) -> Option<&str> {
    headings
        .iter()
        .take_while(|heading| heading.top <= scroll_top)
        .last()
        .map(|heading| heading.id.as_str())
}
