#![forbid(unsafe_code)]
//! hotmirror-core: the pure half of the mirror-fallback protocol.
//!
//! Responsibilities:
//! - Resolve the publishing origin (`owner/repo@ref`) from environment-style config.
//! - Hold the compiled-in, ordered mirror template registry.
//! - Materialize per-artifact candidate URLs in registry (fallback) order.
//! - Define the endpoint manifest document.
//!
//! **No filesystem or network I/O** here. `hotmirror-io` persists manifests and
//! `hotmirror-fetch` walks the candidates.

pub mod artifact;
pub mod config;
pub mod error;
pub mod manifest;
pub mod materialize;
pub mod origin;
pub mod prelude;
pub mod registry;

pub use artifact::{LogicalArtifact, ARTIFACTS, LATEST_JSON, LATEST_TEXT, OUTPUT_DIR};
pub use manifest::{CandidateUrl, EndpointManifest, MANIFEST_FILE};
pub use materialize::{materialize, Materialized};
pub use origin::OriginIdentity;
pub use registry::{list_templates, MirrorKind, MirrorTemplate, PathStyle, PATH_PLACEHOLDER};

/// Crate version recorded for provenance in generated documents.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
