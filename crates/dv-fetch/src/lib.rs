//! Remote content fetching for docview.
//!
//! This crate provides a [`Fetcher`] trait that decouples the page loader
//! from the network:
//!
//! - [`HttpFetcher`] fetches over HTTP(S) with ureq
//! - [`MockFetcher`] serves canned responses (behind the `mock` feature flag)

mod fetcher;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use fetcher::{ErrorStatus, FetchError, FetchErrorKind, Fetcher};
pub use http::HttpFetcher;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFetcher;
