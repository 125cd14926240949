#![forbid(unsafe_code)]
//! hotmirror-fetch: consumer-side ordered fallback over candidate URLs.
//!
//! Candidates are tried strictly in order, one bounded attempt each, and the
//! first response accepted by the [`ResponsePolicy`] wins. Mirrors are never
//! raced. When every candidate fails, the error carries one diagnostic per
//! attempted candidate.
//!
//! The HTTP transport is a trait so the algorithm can be driven by scripted
//! doubles in tests; the reqwest-backed implementation lives behind the `http`
//! feature.

pub mod cancel;
pub mod error;
pub mod fetcher;
#[cfg(feature = "http")]
pub mod http;
pub mod policy;
pub mod transport;

pub use cancel::CancelFlag;
pub use error::{AttemptFailure, FailureReason, FetchError};
pub use fetcher::{prefer_priority, Fetched, Fetcher};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use policy::{Rejection, ResponsePolicy};
pub use transport::{HttpResponse, Transport, TransportError};
