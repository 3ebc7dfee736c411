//! Page identities and the URL fragment codec.
//!
//! The URL fragment is the only persistent state of the viewer. Every
//! displayed page is described by a [`PageId`], and [`encode`] / [`decode`]
//! convert between identities and fragments of the form
//!
//! ```text
//! #<project>/<version>/<contentType>/<page>/<section>
//! ```
//!
//! Each segment is percent-encoded on its own, so page paths such as
//! `docs/getting_started.md` stay a single segment.
//!
//! # Example
//!
//! ```
//! use dv_route::{ContentType, DocSetId, PageId, decode, encode};
//!
//! let page = PageId::new(DocSetId::new("Intern", "4"), ContentType::Docs, "docs/a.md")
//!     .with_section("setup");
//! let fragment = encode(&page);
//! assert_eq!(fragment, "#Intern/4/docs/docs%2Fa.md/setup");
//! assert_eq!(decode(&fragment).into_page_id(), Some(page));
//! ```

mod fragment;
mod identity;

pub use fragment::{Fragment, decode, encode, encode_docset};
pub use identity::{ContentType, DocSetId, Navigation, PageId};
