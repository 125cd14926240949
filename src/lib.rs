#![forbid(unsafe_code)]
//! hotmirror: stable publishing and ordered mirror fallback for the hotwords list.
//!
//! The publisher writes the latest artifacts plus an endpoint manifest listing,
//! per artifact, candidate URLs across third-party mirrors and the origin in
//! the order they must be tried. Consumers walk that list one bounded attempt
//! at a time until a mirror answers.
//!
//! This crate re-exports the workspace members:
//! - [`protocol`]: origin, registry, materializer, manifest model, config.
//! - [`io`]: stores, atomic manifest writer/reader, latest-artifact publisher.
//! - [`fetch`]: transports, response policy and the fallback fetcher.

pub use hotmirror_core as protocol;
pub use hotmirror_fetch as fetch;
pub use hotmirror_io as io;

pub use hotmirror_core::{
    list_templates, materialize, CandidateUrl, EndpointManifest, OriginIdentity, ARTIFACTS,
};
pub use hotmirror_fetch::{FetchError, Fetcher};
pub use hotmirror_io::{generate_manifest, publish_latest, read_manifest, write_manifest};
