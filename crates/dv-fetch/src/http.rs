//! HTTP fetcher backed by ureq.

use std::time::Duration;

use async_trait::async_trait;
use ureq::Agent;

use crate::fetcher::{ErrorStatus, FetchError, FetchErrorKind, Fetcher};

/// Default HTTP timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BACKEND: &str = "Http";

/// Fetches content over HTTP(S).
///
/// ureq is blocking, so each request runs on tokio's blocking pool and
/// requests of one load still proceed concurrently.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn fetch_blocking(agent: &Agent, url: &str) -> Result<String, FetchError> {
        let response = agent
            .get(url)
            .call()
            .map_err(|e| classify(e).with_url(url).with_backend(BACKEND))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::from_http_status(status, url).with_backend(BACKEND));
        }

        response.into_body().read_to_string().map_err(|e| {
            FetchError::new(FetchErrorKind::InvalidBody)
                .with_url(url)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(err: ureq::Error) -> FetchError {
    let (kind, status) = match &err {
        ureq::Error::Timeout(_) => (FetchErrorKind::Timeout, ErrorStatus::Temporary),
        ureq::Error::BadUri(_) => (FetchErrorKind::InvalidUrl, ErrorStatus::Permanent),
        ureq::Error::Io(_) | ureq::Error::ConnectionFailed | ureq::Error::HostNotFound => {
            (FetchErrorKind::Unavailable, ErrorStatus::Temporary)
        }
        _ => (FetchErrorKind::Other, ErrorStatus::Permanent),
    };
    FetchError::new(kind).with_status(status).with_source(err)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let agent = self.agent.clone();
        let owned = url.to_owned();
        let result =
            tokio::task::spawn_blocking(move || Self::fetch_blocking(&agent, &owned)).await;

        match result {
            Ok(Ok(body)) => {
                tracing::debug!(url, bytes = body.len(), "Fetched");
                Ok(body)
            }
            Ok(Err(err)) => {
                tracing::debug!(url, error = %err, "Fetch failed");
                Err(err)
            }
            Err(join) => Err(FetchError::new(FetchErrorKind::Other)
                .with_url(url)
                .with_backend(BACKEND)
                .with_source(join)),
        }
    }
}
