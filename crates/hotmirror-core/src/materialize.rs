//! Endpoint materialization: (origin, templates, artifacts) -> ordered candidates.
//!
//! Pure and deterministic: identical inputs give identical output. Candidate
//! order per artifact is registry order and is never changed afterwards.

use std::collections::BTreeMap;

use url::Url;

use crate::artifact::LogicalArtifact;
use crate::error::TemplateError;
use crate::manifest::CandidateUrl;
use crate::origin::OriginIdentity;
use crate::registry::{MirrorTemplate, PATH_PLACEHOLDER};

/// Result of materializing every artifact against a template list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Materialized {
    /// Artifact name -> candidates in fallback order.
    pub artifacts: BTreeMap<String, Vec<CandidateUrl>>,
    /// Templates that produced no candidate, one entry per template.
    pub skipped: Vec<TemplateError>,
}

impl Materialized {
    pub fn candidates(&self, artifact: &str) -> Option<&[CandidateUrl]> {
        self.artifacts.get(artifact).map(|v| v.as_slice())
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Materialize candidates for every artifact.
///
/// A bad template only loses its own candidate; it is reported in
/// [`Materialized::skipped`] and the remaining templates still materialize.
pub fn materialize(
    origin: &OriginIdentity,
    templates: &[MirrorTemplate],
    artifacts: &[LogicalArtifact],
) -> Materialized {
    let mut out = Materialized::default();

    for artifact in artifacts {
        let mut candidates = Vec::with_capacity(templates.len());
        for (position, template) in templates.iter().enumerate() {
            match materialize_one(origin, template, position, artifact) {
                Ok(candidate) => candidates.push(candidate),
                Err(err) => {
                    if !out.skipped.iter().any(|e| e.priority() == position) {
                        tracing::warn!(
                            template = %template.name,
                            priority = position,
                            error = %err,
                            "skipping mirror template"
                        );
                        out.skipped.push(err);
                    }
                }
            }
        }
        out.artifacts.insert(artifact.name().to_string(), candidates);
    }

    tracing::debug!(
        origin = %origin,
        artifacts = out.artifacts.len(),
        templates = templates.len(),
        skipped = out.skipped.len(),
        "materialized endpoints"
    );
    out
}

/// Materialize a single (template, artifact) pair. `position` becomes the
/// candidate's priority.
pub fn materialize_one(
    origin: &OriginIdentity,
    template: &MirrorTemplate,
    position: usize,
    artifact: &LogicalArtifact,
) -> Result<CandidateUrl, TemplateError> {
    let pattern = template.url_pattern.as_ref();
    match template.placeholder_count() {
        0 => {
            return Err(TemplateError::MissingPlaceholder {
                priority: position,
                pattern: pattern.to_string(),
            })
        }
        1 => {}
        count => {
            return Err(TemplateError::RepeatedPlaceholder {
                priority: position,
                pattern: pattern.to_string(),
                count,
            })
        }
    }

    let malformed = |reason: String| TemplateError::Malformed {
        priority: position,
        pattern: pattern.to_string(),
        reason,
    };

    if pattern.replacen(PATH_PLACEHOLDER, "", 1).contains(['{', '}']) {
        return Err(malformed("unknown placeholder or stray brace".into()));
    }

    let path = template.style.render(origin, &artifact.repo_path());
    let candidate = pattern.replacen(PATH_PLACEHOLDER, &path, 1);

    let parsed = Url::parse(&candidate).map_err(|e| malformed(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(malformed(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(malformed("missing host".into()));
    }

    Ok(CandidateUrl::new(position, candidate))
}
