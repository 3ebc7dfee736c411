//! Fetcher trait and error types.
//!
//! Provides the [`Fetcher`] trait for retrieving remote documentation content,
//! along with [`FetchError`] for unified error handling across backends.

use async_trait::async_trait;

/// Retrieves text content by URL.
///
/// Implementations must be shareable across tasks: the page loader issues all
/// fetches of one doc set concurrently.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body of `url` as UTF-8 text.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchErrorKind {
    /// Resource does not exist (HTTP 404/410).
    NotFound,
    /// Access denied (HTTP 401/403).
    PermissionDenied,
    /// URL could not be parsed or used.
    InvalidUrl,
    /// Server error or connection failure.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Request timed out.
    Timeout,
    /// Body is not valid text.
    InvalidBody,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (not found, invalid URL).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (rate limited, service unavailable).
    Persistent,
}

/// Fetch error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub status: ErrorStatus,
    /// URL being fetched (if known).
    pub url: Option<String>,
    /// HTTP status code of the response, when one was received.
    pub http_status: Option<u16>,
    /// Backend identifier (e.g., "Http", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    #[must_use]
    pub fn new(kind: FetchErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            url: None,
            http_status: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error for `url`.
    #[must_use]
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NotFound).with_url(url)
    }

    /// Classify an HTTP error status code.
    #[must_use]
    pub fn from_http_status(code: u16, url: impl Into<String>) -> Self {
        let (kind, status) = match code {
            404 | 410 => (FetchErrorKind::NotFound, ErrorStatus::Permanent),
            401 | 403 => (FetchErrorKind::PermissionDenied, ErrorStatus::Permanent),
            408 => (FetchErrorKind::Timeout, ErrorStatus::Temporary),
            429 => (FetchErrorKind::RateLimited, ErrorStatus::Persistent),
            500..=599 => (FetchErrorKind::Unavailable, ErrorStatus::Persistent),
            _ => (FetchErrorKind::Other, ErrorStatus::Permanent),
        };
        let mut error = Self::new(kind).with_status(status).with_url(url);
        error.http_status = Some(code);
        error
    }

    /// Whether a retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.status != ErrorStatus::Permanent
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind (HTTP 404): message (url: https://...)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            FetchErrorKind::NotFound => "Not found",
            FetchErrorKind::PermissionDenied => "Permission denied",
            FetchErrorKind::InvalidUrl => "Invalid URL",
            FetchErrorKind::Unavailable => "Unavailable",
            FetchErrorKind::RateLimited => "Rate limited",
            FetchErrorKind::Timeout => "Timeout",
            FetchErrorKind::InvalidBody => "Invalid body",
            FetchErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(code) = self.http_status {
            write!(f, " (HTTP {code})")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(url) = &self.url {
            write!(f, " (url: {url})")?;
        }

        Ok(())
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
