//! The navigation state machine.
//!
//! Every fragment change enters [`ViewController::navigate`], which resolves
//! the doc set against the registry, loads it through the shared
//! [`DocSetLoader`], validates the page and section, then updates the host.
//! Invalid parts of a fragment are repaired by redirecting to a corrected
//! fragment and resolving again.
//!
//! # Staleness
//!
//! Each navigation takes a generation number. A navigation whose load
//! settles after a newer navigation started reports [`Navigated::Superseded`]
//! and leaves the display alone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dv_config::ViewerConfig;
use dv_route::{
    ContentType, DocSetId, Fragment, Navigation, PageId, decode, encode, encode_docset,
};
use dv_site::{
    DocSetLoader, LoadError, LoadedDocSet, RenderedPage, mark_occurrences, search_pages,
};

use crate::debounce::Debouncer;
use crate::host::{SearchResults, Selectors, ViewHost};
use crate::scroll::{HeadingOffset, ScrollUpdate, section_at};

/// Redirects one navigation may follow.
const MAX_REDIRECTS: usize = 4;

/// Where the controller is in handling the latest navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Uninitialized,
    ResolvingDocSet,
    LoadingContent,
    Ready,
    Error,
}

/// What caused a fragment change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashSource {
    /// Typed, bookmarked or clicked by the user.
    User,
    /// Written by scroll tracking. Only moves the menu highlight.
    Scroll,
    /// A project or version selector changed.
    Selector,
    /// Written by the controller while repairing a fragment.
    Redirect,
}

/// Result of a navigation that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigated {
    Shown(PageId),
    /// A newer navigation started before this one finished loading.
    Superseded,
}

/// Error presented to the user by the controller.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("No documentation found for \"{fragment}\"")]
    InvalidIdentity { fragment: String },

    #[error("{docset} has no {content_type} pages")]
    EmptyDocSet {
        docset: DocSetId,
        content_type: ContentType,
    },

    #[error("Failed to load {docset}: {source}")]
    Load {
        docset: DocSetId,
        #[source]
        source: LoadError,
    },

    #[error("Too many redirects resolving \"{fragment}\"")]
    TooManyRedirects { fragment: String },

    #[error("No documentation sets are configured")]
    NoDocSets,
}

/// Debounce and search settings.
#[derive(Clone, Debug)]
pub struct ViewerOptions {
    pub scroll_debounce: Duration,
    pub search_debounce: Duration,
    /// Shorter search terms clear the results.
    pub search_min_length: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for ViewerOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            scroll_debounce: Duration::from_millis(config.scroll_debounce_ms),
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            search_min_length: config.search_min_length,
        }
    }
}

enum Step {
    Show(PageId),
    Redirect(String),
    Stale,
}

enum Resolved {
    DocSet(DocSetId),
    Redirect(String),
}

#[derive(Default)]
struct Inner {
    state: ViewState,
    current: Option<PageId>,
    /// Doc set and content type whose menu is mounted.
    menu: Option<(DocSetId, ContentType)>,
    search_term: Option<String>,
}

/// Keeps the fragment, the displayed page and the menu in agreement.
///
/// The inner lock is never held across an await or while calling the host.
pub struct ViewController<H> {
    loader: Arc<DocSetLoader>,
    host: H,
    options: ViewerOptions,
    inner: Mutex<Inner>,
    generation: AtomicU64,
    scroll: Debouncer<ScrollUpdate>,
    search: Debouncer<String>,
}

impl<H: ViewHost> ViewController<H> {
    #[must_use]
    pub fn new(loader: Arc<DocSetLoader>, host: H, options: ViewerOptions) -> Self {
        Self {
            loader,
            host,
            scroll: Debouncer::new(options.scroll_debounce),
            search: Debouncer::new(options.search_debounce),
            options,
            inner: Mutex::new(Inner::default()),
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn loader(&self) -> &DocSetLoader {
        &self.loader
    }

    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.inner.lock().unwrap().state
    }

    /// The identity on screen.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn current(&self) -> Option<PageId> {
        self.inner.lock().unwrap().current.clone()
    }

    /// Show the initial fragment, or the default page when there is none.
    pub async fn start(&self, fragment: Option<&str>) -> Result<Navigated, ViewError> {
        self.navigate(fragment.unwrap_or_default(), HashSource::User)
            .await
    }

    /// Handle a fragment change.
    ///
    /// Fragments written by scroll tracking or by the controller itself
    /// that stay on the displayed page only move the menu highlight.
    /// Anything else is resolved, loaded and validated; corrections are
    /// written back through [`ViewHost::set_fragment`].
    pub async fn navigate(
        &self,
        fragment: &str,
        source: HashSource,
    ) -> Result<Navigated, ViewError> {
        tracing::debug!(fragment, ?source, "Navigating");

        if matches!(source, HashSource::Scroll | HashSource::Redirect)
            && let Some(id) = self.same_page_target(fragment)
        {
            self.apply_section(&id);
            return Ok(Navigated::Shown(id));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut target = fragment.to_owned();
        for _ in 0..=MAX_REDIRECTS {
            match self.resolve(&target, generation).await {
                Ok(Step::Show(id)) => {
                    let canonical = encode(&id);
                    if canonical.trim_start_matches('#') != target.trim_start_matches('#') {
                        self.host.set_fragment(&canonical);
                    }
                    return Ok(Navigated::Shown(id));
                }
                Ok(Step::Redirect(next)) => {
                    tracing::debug!(from = %target, to = %next, "Redirecting");
                    self.host.set_fragment(&next);
                    target = next;
                }
                Ok(Step::Stale) => return Ok(Navigated::Superseded),
                Err(err) => return self.fail(err, generation),
            }
        }
        self.fail(ViewError::TooManyRedirects { fragment: target }, generation)
    }

    /// Switch to the latest version of `project`.
    pub async fn select_project(&self, project: &str) -> Result<Navigated, ViewError> {
        let Ok(version) = self.loader.registry().latest_version(project) else {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let err = ViewError::InvalidIdentity {
                fragment: project.to_owned(),
            };
            return self.fail(err, generation);
        };
        let fragment = encode_docset(&DocSetId::new(project, version));
        self.host.set_fragment(&fragment);
        self.navigate(&fragment, HashSource::Selector).await
    }

    /// Switch the displayed project to `version`.
    ///
    /// The current page is kept when the new version has it; otherwise the
    /// first page of the same content type is shown.
    pub async fn select_version(&self, version: &str) -> Result<Navigated, ViewError> {
        let registry = self.loader.registry();
        let current = self.current();
        let project = match &current {
            Some(id) => Some(id.docset.project.clone()),
            None => registry.default_docset().map(|docset| docset.project),
        };
        let Some(project) = project else {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            return self.fail(ViewError::NoDocSets, generation);
        };

        let docset = DocSetId::new(project, version);
        let has_api = registry
            .get_docset(&docset)
            .is_ok_and(|d| d.api_data_path.is_some());
        let fragment = match current {
            Some(id) if id.content_type == ContentType::Docs || has_api => {
                encode(&PageId::new(docset, id.content_type, id.page))
            }
            _ => encode_docset(&docset),
        };
        self.host.set_fragment(&fragment);
        self.navigate(&fragment, HashSource::Selector).await
    }

    /// Record a scroll of the content pane.
    ///
    /// The section is recomputed once scrolling pauses, see
    /// [`settle_scroll`](Self::settle_scroll).
    pub fn on_scroll(&self, scroll_top: f64, headings: Vec<HeadingOffset>) {
        if let Some(page) = self.current() {
            self.scroll.record(ScrollUpdate {
                page,
                scroll_top,
                headings,
            });
        }
    }

    /// Wait for scrolling to pause and sync the fragment with it.
    ///
    /// Returns the new identity when the section changed.
    pub async fn settle_scroll(&self) -> Option<PageId> {
        let update = self.scroll.settled().await?;
        self.apply_scroll(&update)
    }

    /// Like [`settle_scroll`](Self::settle_scroll) without waiting.
    pub fn poll_scroll(&self) -> Option<PageId> {
        let update = self.scroll.take_ready()?;
        self.apply_scroll(&update)
    }

    /// Record a change of the search input.
    pub fn on_search_input(&self, term: impl Into<String>) {
        self.search.record(term.into());
    }

    /// Wait for typing to pause and run the search.
    pub async fn settle_search(&self) -> Option<SearchResults> {
        let term = self.search.settled().await?;
        Some(self.search_now(&term))
    }

    /// Like [`settle_search`](Self::settle_search) without waiting.
    pub fn poll_search(&self) -> Option<SearchResults> {
        let term = self.search.take_ready()?;
        Some(self.search_now(&term))
    }

    /// Search the displayed doc set and content type immediately.
    ///
    /// Terms shorter than the minimum length clear the results. The
    /// displayed page is remounted with the term highlighted.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn search_now(&self, term: &str) -> SearchResults {
        let term = term.trim();
        let shown = self
            .current()
            .and_then(|id| Some((self.loader.cached(&id.docset)?, id)));

        let results = match &shown {
            Some((loaded, id))
                if !term.is_empty() && term.chars().count() >= self.options.search_min_length =>
            {
                SearchResults {
                    term: Some(term.to_owned()),
                    hits: search_pages(
                        &id.docset,
                        id.content_type,
                        loaded.pages(id.content_type),
                        term,
                    ),
                }
            }
            _ => SearchResults::default(),
        };

        let previous = std::mem::replace(
            &mut self.inner.lock().unwrap().search_term,
            results.term.clone(),
        );
        self.host.show_search_results(&results);

        if previous != results.term
            && let Some((loaded, id)) = &shown
            && let Some(page) = loaded.page(id.content_type, &id.page)
        {
            self.mount(page, id, results.term.as_deref());
        }
        results
    }

    async fn resolve(&self, fragment: &str, generation: u64) -> Result<Step, ViewError> {
        self.set_state(ViewState::ResolvingDocSet);
        let parsed = decode(fragment);
        let docset = match self.resolve_docset(&parsed, fragment)? {
            Resolved::DocSet(docset) => docset,
            Resolved::Redirect(next) => return Ok(Step::Redirect(next)),
        };

        self.set_state(ViewState::LoadingContent);
        let loaded = self
            .loader
            .load(&docset)
            .await
            .map_err(|source| ViewError::Load {
                docset: docset.clone(),
                source,
            })?;
        if !self.is_current(generation) {
            tracing::debug!(docset = %docset, "Discarding stale navigation");
            return Ok(Step::Stale);
        }

        let content_type = parsed.content_type.unwrap_or_default();
        let Some(page) = parsed
            .page
            .as_deref()
            .and_then(|name| loaded.page(content_type, name))
        else {
            let first = loaded
                .first_page(content_type)
                .ok_or_else(|| ViewError::EmptyDocSet {
                    docset: docset.clone(),
                    content_type,
                })?;
            return Ok(Step::Redirect(encode(&PageId::new(docset, content_type, first))));
        };

        let base = PageId::new(docset, content_type, page.name.as_str());
        if let Some(section) = parsed.section.as_deref()
            && !page.has_section(section)
        {
            tracing::debug!(section, page = %page.name, "Dropping unknown section");
            return Ok(Step::Redirect(encode(&base)));
        }

        let id = base.at_section(parsed.section.as_deref());
        self.show(&loaded, page, &id);
        Ok(Step::Show(id))
    }

    fn resolve_docset(&self, parsed: &Fragment, fragment: &str) -> Result<Resolved, ViewError> {
        let registry = self.loader.registry();
        let invalid = || ViewError::InvalidIdentity {
            fragment: fragment.to_owned(),
        };

        let Some(project) = parsed.project.as_deref() else {
            let docset = registry.default_docset().ok_or(ViewError::NoDocSets)?;
            return Ok(Resolved::Redirect(self.default_fragment(&docset)));
        };
        let Some(version) = parsed.version.as_deref() else {
            let latest = registry.latest_version(project).map_err(|_| invalid())?;
            return Ok(Resolved::Redirect(encode_docset(&DocSetId::new(
                project, latest,
            ))));
        };

        let docset = DocSetId::new(project, version);
        if let Err(err) = registry.get_docset(&docset) {
            tracing::debug!(error = %err, "Unknown doc set");
            return Err(invalid());
        }
        Ok(Resolved::DocSet(docset))
    }

    fn default_fragment(&self, docset: &DocSetId) -> String {
        let first = self
            .loader
            .registry()
            .get_docset(docset)
            .ok()
            .and_then(|d| d.first_page());
        match first {
            Some(page) => encode(&PageId::new(docset.clone(), ContentType::Docs, page)),
            None => encode_docset(docset),
        }
    }

    fn show(&self, loaded: &LoadedDocSet, page: &RenderedPage, id: &PageId) {
        let menu_key = (id.docset.clone(), id.content_type);
        let (previous, mounted_menu, term) = {
            let mut inner = self.inner.lock().unwrap();
            inner.state = ViewState::Ready;
            (
                inner.current.replace(id.clone()),
                inner.menu.replace(menu_key.clone()),
                inner.search_term.clone(),
            )
        };
        let navigation = previous.as_ref().map(|previous| id.navigation_from(previous));

        if navigation != Some(Navigation::SamePage) {
            self.mount(page, id, term.as_deref());
        }
        match loaded.menu(id.content_type) {
            Some(menu) if mounted_menu.as_ref() != Some(&menu_key) => {
                self.host.mount_menu(menu, id);
            }
            _ => self.host.highlight_menu(id),
        }
        if matches!(navigation, None | Some(Navigation::DocSetChange)) {
            self.host.update_selectors(&self.selectors(&id.docset));
        }
        self.host.scroll_to(id.section.as_deref());

        tracing::debug!(fragment = %encode(id), ?navigation, "Page shown");
    }

    fn mount(&self, page: &RenderedPage, id: &PageId, term: Option<&str>) {
        let Some(term) = term else {
            self.host.mount_content(page, id);
            return;
        };
        let (html, marks) = mark_occurrences(&page.html, term);
        tracing::debug!(term, marks, "Highlighting search term");
        self.host.mount_content(&RenderedPage { html, ..page.clone() }, id);
    }

    fn selectors(&self, docset: &DocSetId) -> Selectors {
        let registry = self.loader.registry();
        Selectors {
            projects: registry.list_projects().map(str::to_owned).collect(),
            project: docset.project.clone(),
            versions: registry
                .list_versions(&docset.project)
                .map(|versions| versions.into_iter().map(str::to_owned).collect())
                .unwrap_or_default(),
            version: docset.version.clone(),
            latest: registry
                .latest_version(&docset.project)
                .ok()
                .map(str::to_owned),
            next: registry
                .next_version(&docset.project)
                .ok()
                .flatten()
                .map(str::to_owned),
        }
    }

    fn same_page_target(&self, fragment: &str) -> Option<PageId> {
        let current = self.current()?;
        let id = decode(fragment).into_page_id()?;
        id.same_page(&current).then_some(id)
    }

    fn apply_section(&self, id: &PageId) {
        let previous = self.inner.lock().unwrap().current.replace(id.clone());
        if previous.as_ref() != Some(id) {
            self.host.highlight_menu(id);
        }
    }

    fn apply_scroll(&self, update: &ScrollUpdate) -> Option<PageId> {
        let current = self.current()?;
        if !current.same_page(&update.page) {
            tracing::debug!("Ignoring scroll recorded on another page");
            return None;
        }
        let section = section_at(&update.headings, update.scroll_top);
        if section == current.section.as_deref() {
            return None;
        }
        let id = current.at_section(section);
        self.host.set_fragment(&encode(&id));
        self.apply_section(&id);
        Some(id)
    }

    fn fail(&self, err: ViewError, generation: u64) -> Result<Navigated, ViewError> {
        if !self.is_current(generation) {
            tracing::debug!(error = %err, "Discarding error of stale navigation");
            return Ok(Navigated::Superseded);
        }
        tracing::warn!(error = %err, "Navigation failed");
        self.set_state(ViewState::Error);
        self.host.show_error(&err);
        Err(err)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn set_state(&self, state: ViewState) {
        self.inner.lock().unwrap().state = state;
    }
}
