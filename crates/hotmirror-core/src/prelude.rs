//! Convenient re-exports for downstream crates.

pub use crate::artifact::{LogicalArtifact, ARTIFACTS, LATEST_JSON, LATEST_TEXT};
pub use crate::config::{FetchConfig, PublishConfig};
pub use crate::error::{Error, Result, TemplateError};
pub use crate::manifest::{CandidateUrl, EndpointManifest, MANIFEST_FILE};
pub use crate::materialize::{materialize, Materialized};
pub use crate::origin::OriginIdentity;
pub use crate::registry::{list_templates, MirrorKind, MirrorTemplate, PathStyle};
