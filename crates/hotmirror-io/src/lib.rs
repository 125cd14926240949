#![forbid(unsafe_code)]
//! hotmirror-io: everything that touches persistent storage.
//!
//! - `store`: the [`Store`] trait with filesystem and in-memory backends.
//! - `endpoints`: atomic endpoint-manifest writer/reader and the `generate` step.
//! - `publish`: stable `hotwords_latest.*` artifacts from a merged hotwords list.

pub mod endpoints;
pub mod error;
pub mod publish;
pub mod store;

pub use endpoints::{generate_manifest, read_manifest, write_manifest, GenerateReport};
pub use error::{Error, Result};
pub use publish::{publish_latest, HotwordsList, LatestMeta, PublishReport};
pub use store::{FsStore, MemoryStore, Store};
