//! Mock fetcher implementation for testing.
//!
//! Provides [`MockFetcher`] for unit testing without network access.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::fetcher::{FetchError, FetchErrorKind, Fetcher};

/// Mock fetcher for testing.
///
/// Serves canned responses from memory and counts every call per URL.
/// Unknown URLs fail with [`FetchErrorKind::NotFound`].
///
/// # Example
///
/// ```ignore
/// use dv_fetch::{Fetcher, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_text("https://example.com/a.md", "# A")
///     .with_latency(Duration::from_millis(20));
///
/// let body = fetcher.fetch_text("https://example.com/a.md").await?;
/// assert_eq!(fetcher.call_count("https://example.com/a.md"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: RwLock<HashMap<String, Result<String, FetchErrorKind>>>,
    latency: RwLock<HashMap<String, Duration>>,
    default_latency: RwLock<Option<Duration>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_text(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_text(url, body);
        self
    }

    /// Fail requests for `url` with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_error(self, url: impl Into<String>, kind: FetchErrorKind) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Err(kind));
        self
    }

    /// Delay every response by `latency`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.default_latency.write().unwrap() = Some(latency);
        self
    }

    /// Delay responses for `url` by `latency`, overriding the default.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_url_latency(self, url: impl Into<String>, latency: Duration) -> Self {
        self.latency.write().unwrap().insert(url.into(), latency);
        self
    }

    /// Replace the response for `url` after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_text(&self, url: impl Into<String>, body: impl Into<String>) {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Ok(body.into()));
    }

    /// Number of fetches issued for `url`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Number of fetches issued for all URLs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default() += 1;

        let latency = self
            .latency
            .read()
            .unwrap()
            .get(url)
            .copied()
            .or(*self.default_latency.read().unwrap());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(Ok(body)) => Ok(body),
            Some(Err(kind)) => Err(FetchError::new(kind).with_url(url).with_backend("Mock")),
            None => Err(FetchError::not_found(url).with_backend("Mock")),
        }
    }
}
