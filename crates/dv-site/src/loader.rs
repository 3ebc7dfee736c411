//! Doc set loading with a per-doc-set cache.
//!
//! # Concurrency
//!
//! Each doc set owns one cache slot, a [`tokio::sync::OnceCell`] created on
//! first request. The slot itself is stored before any fetch starts, so a
//! second `load` of the same doc set awaits the in-flight initialisation
//! instead of fetching again. The slot map lock is only held to look up or
//! insert a slot, never across an await.
//!
//! A failed load leaves its slot empty, so navigating to the doc set again
//! retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use dv_api::{ApiError, ApiTree, RenderOptions, render_api_pages};
use dv_config::ViewerConfig;
use dv_fetch::{FetchError, Fetcher};
use dv_route::{ContentType, DocSetId};
use futures_util::future::{try_join, try_join_all};
use tokio::sync::OnceCell;

use crate::menu::Menu;
use crate::page::{RenderedPage, render_markdown_page};
use crate::registry::{DocSet, Registry, RegistryError};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Error loading a doc set.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("Invalid API data at {url}: {source}")]
    ApiData {
        url: String,
        #[source]
        source: ApiError,
    },
}

/// Settings used when rendering a loaded doc set.
#[derive(Clone, Debug)]
pub struct LoaderOptions {
    pub menu_depth: u8,
    pub api_menu_depth: u8,
    pub signature_width: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for LoaderOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            menu_depth: config.menu_depth,
            api_menu_depth: config.api_menu_depth,
            signature_width: config.signature_width,
        }
    }
}

/// A fully loaded and rendered doc set.
#[derive(Debug)]
pub struct LoadedDocSet {
    pub docset: DocSet,
    pub pages: Vec<RenderedPage>,
    pub menu: Menu,
    pub api_pages: Vec<RenderedPage>,
    /// Present when the doc set has API data.
    pub api_menu: Option<Menu>,
}

impl LoadedDocSet {
    #[must_use]
    pub fn id(&self) -> &DocSetId {
        &self.docset.id
    }

    #[must_use]
    pub fn pages(&self, content_type: ContentType) -> &[RenderedPage] {
        match content_type {
            ContentType::Docs => &self.pages,
            ContentType::Api => &self.api_pages,
        }
    }

    #[must_use]
    pub fn page(&self, content_type: ContentType, name: &str) -> Option<&RenderedPage> {
        self.pages(content_type).iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn first_page(&self, content_type: ContentType) -> Option<&str> {
        self.pages(content_type).first().map(|p| p.name.as_str())
    }

    #[must_use]
    pub fn menu(&self, content_type: ContentType) -> Option<&Menu> {
        match content_type {
            ContentType::Docs => Some(&self.menu),
            ContentType::Api => self.api_menu.as_ref(),
        }
    }
}

type Slot = Arc<OnceCell<Arc<LoadedDocSet>>>;

/// Loads doc sets once and serves them from memory afterwards.
pub struct DocSetLoader {
    registry: Arc<Registry>,
    fetcher: Arc<dyn Fetcher>,
    options: LoaderOptions,
    slots: Mutex<HashMap<DocSetId, Slot>>,
}

impl DocSetLoader {
    #[must_use]
    pub fn new(registry: Arc<Registry>, fetcher: Arc<dyn Fetcher>, options: LoaderOptions) -> Self {
        Self {
            registry,
            fetcher,
            options,
            slots: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn slot(&self, id: &DocSetId) -> Slot {
        let mut slots = self.slots.lock().unwrap();
        Arc::clone(slots.entry(id.clone()).or_default())
    }

    /// The loaded doc set, if a load already completed.
    ///
    /// # Panics
    ///
    /// Panics if the slot map lock is poisoned.
    #[must_use]
    pub fn cached(&self, id: &DocSetId) -> Option<Arc<LoadedDocSet>> {
        let slots = self.slots.lock().unwrap();
        slots.get(id).and_then(|slot| slot.get()).map(Arc::clone)
    }

    /// Load a doc set, fetching its content on first use.
    ///
    /// All pages and the API data are fetched concurrently. The doc set is
    /// only returned once everything has been fetched and rendered; the
    /// first failed fetch fails the whole load.
    ///
    /// # Panics
    ///
    /// Panics if the slot map lock is poisoned.
    pub async fn load(&self, id: &DocSetId) -> Result<Arc<LoadedDocSet>, LoadError> {
        let docset = self.registry.get_docset(id)?;
        let slot = self.slot(id);

        if let Some(loaded) = slot.get() {
            tracing::debug!(docset = %id, "Doc set cache hit");
            return Ok(Arc::clone(loaded));
        }

        let loaded = slot
            .get_or_try_init(|| self.fetch_and_render(docset.clone()))
            .await?;
        Ok(Arc::clone(loaded))
    }

    async fn fetch_and_render(&self, docset: DocSet) -> Result<Arc<LoadedDocSet>, LoadError> {
        let start = Instant::now();

        let page_fetches = docset.pages.iter().map(|page| {
            let url = docset.page_url(page);
            async move {
                self.fetcher
                    .fetch_text(&url)
                    .await
                    .map_err(|source| LoadError::Fetch { url, source })
            }
        });
        let api_fetch = async {
            match docset.api_data_url() {
                Some(url) => match self.fetcher.fetch_text(&url).await {
                    Ok(json) => Ok(Some((url, json))),
                    Err(source) => Err(LoadError::Fetch { url, source }),
                },
                None => Ok(None),
            }
        };

        let (texts, api) = match try_join(try_join_all(page_fetches), api_fetch).await {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::warn!(docset = %docset.id, error = %err, "Doc set load failed");
                return Err(err);
            }
        };
        let fetch_ms = elapsed_ms(start);

        let render_start = Instant::now();
        let pages: Vec<RenderedPage> = docset
            .pages
            .iter()
            .zip(&texts)
            .map(|(page, text)| render_markdown_page(&docset, page, text))
            .collect();
        let menu = Menu::build(
            &docset.id,
            ContentType::Docs,
            &pages,
            self.options.menu_depth,
            &docset.id.project,
        );

        let (api_pages, api_menu) = match api {
            Some((url, json)) => {
                let tree = ApiTree::from_json(&json)
                    .map_err(|source| LoadError::ApiData { url, source })?;
                let options = RenderOptions {
                    signature_width: self.options.signature_width,
                    source_base: Some(docset.source_browse_url()),
                };
                let api = render_api_pages(&docset.id, &tree, &options);
                if api.unresolved > 0 {
                    tracing::debug!(
                        docset = %docset.id,
                        unresolved = api.unresolved,
                        "API references left unresolved"
                    );
                }
                let api_pages: Vec<RenderedPage> =
                    api.pages.into_iter().map(RenderedPage::from).collect();
                let api_menu = Menu::build(
                    &docset.id,
                    ContentType::Api,
                    &api_pages,
                    self.options.api_menu_depth,
                    &docset.id.project,
                );
                (api_pages, Some(api_menu))
            }
            None => (Vec::new(), None),
        };

        tracing::info!(
            docset = %docset.id,
            source = "network",
            page_count = pages.len(),
            api_page_count = api_pages.len(),
            fetch_ms,
            render_ms = elapsed_ms(render_start),
            elapsed_ms = elapsed_ms(start),
            "Doc set loaded"
        );

        Ok(Arc::new(LoadedDocSet {
            docset,
            pages,
            menu,
            api_pages,
            api_menu,
        }))
    }
}
