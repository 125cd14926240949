//! Endpoint manifest: per-artifact candidate URLs in fallback order.
//!
//! Regenerated wholesale on every publishing run and written over the previous
//! one; nothing is merged or versioned.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::origin::OriginIdentity;

/// File name of the manifest, next to the primary artifacts.
pub const MANIFEST_FILE: &str = "hotwords_latest_endpoints.json";

/// Resolution strategy advertised to consumers.
pub const STRATEGY: &str = "ordered-fallback";

/// One fully materialized URL for one (artifact, template) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateUrl {
    #[serde(rename = "priority")]
    pub mirror_priority: usize,
    pub url: String,
}

impl CandidateUrl {
    pub fn new(mirror_priority: usize, url: impl Into<String>) -> Self {
        Self {
            mirror_priority,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointManifest {
    pub generated_at: DateTime<Utc>,
    pub origin: OriginIdentity,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    pub artifacts: BTreeMap<String, Vec<CandidateUrl>>,
}

fn default_strategy() -> String {
    STRATEGY.to_string()
}

impl EndpointManifest {
    pub fn new(
        origin: OriginIdentity,
        artifacts: BTreeMap<String, Vec<CandidateUrl>>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            origin,
            strategy: default_strategy(),
            artifacts,
        }
    }

    /// Candidates for `artifact`, in the order they must be tried.
    pub fn candidates(&self, artifact: &str) -> Option<&[CandidateUrl]> {
        self.artifacts.get(artifact).map(|v| v.as_slice())
    }

    /// Check that every candidate list is in strictly increasing priority order.
    ///
    /// Readers call this before trusting a manifest that came over the wire.
    pub fn validate(&self) -> Result<()> {
        for (name, candidates) in &self.artifacts {
            if candidates.is_empty() {
                return Err(Error::Invariant(format!("artifact '{name}' has no candidates")));
            }
            let ordered = candidates
                .windows(2)
                .all(|w| w[0].mirror_priority < w[1].mirror_priority);
            if !ordered {
                return Err(Error::Invariant(format!(
                    "artifact '{name}' candidates are not in priority order"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }

    /// Parse raw bytes; input that is not UTF-8 is rejected, never repaired.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let manifest: Self = serde_json::from_slice(bytes)?;
        manifest.validate()?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> EndpointManifest {
        let mut artifacts = BTreeMap::new();
        artifacts.insert(
            "hotwords_latest.txt".to_string(),
            vec![
                CandidateUrl::new(0, "https://a.example/x"),
                CandidateUrl::new(1, "https://b.example/x"),
            ],
        );
        EndpointManifest::new(
            OriginIdentity::new("acme", "hotwords", "main").unwrap(),
            artifacts,
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap(),
        )
    }

    #[test]
    fn json_shape_matches_published_contract() {
        let v: serde_json::Value = serde_json::from_str(&sample().to_json_pretty().unwrap()).unwrap();
        assert_eq!(v["generatedAt"], "2025-03-01T08:30:00Z");
        assert_eq!(v["origin"]["owner"], "acme");
        assert_eq!(v["origin"]["repo"], "hotwords");
        assert_eq!(v["origin"]["ref"], "main");
        assert_eq!(v["strategy"], STRATEGY);
        assert_eq!(v["artifacts"]["hotwords_latest.txt"][1]["priority"], 1);
        assert_eq!(
            v["artifacts"]["hotwords_latest.txt"][0]["url"],
            "https://a.example/x"
        );
    }

    #[test]
    fn strategy_defaults_when_absent() {
        let doc = r#"{
            "generatedAt": "2025-03-01T08:30:00+08:00",
            "origin": {"owner": "acme", "repo": "hotwords", "ref": "main"},
            "artifacts": {"hotwords_latest.txt": [{"priority": 0, "url": "https://a.example/x"}]}
        }"#;
        let m = EndpointManifest::from_json(doc).unwrap();
        assert_eq!(m.strategy, STRATEGY);
        assert_eq!(m.generated_at, Utc.with_ymd_and_hms(2025, 3, 1, 0, 30, 0).unwrap());
    }

    #[test]
    fn out_of_order_candidates_are_rejected() {
        let doc = r#"{
            "generatedAt": "2025-03-01T08:30:00Z",
            "origin": {"owner": "acme", "repo": "hotwords", "ref": "main"},
            "artifacts": {"hotwords_latest.txt": [
                {"priority": 1, "url": "https://b.example/x"},
                {"priority": 0, "url": "https://a.example/x"}
            ]}
        }"#;
        let err = EndpointManifest::from_json(doc).unwrap_err();
        assert!(err.to_string().contains("priority order"));
    }

    #[test]
    fn lookup_candidates() {
        let m = sample();
        assert_eq!(m.candidates("hotwords_latest.txt").map(|c| c.len()), Some(2));
        assert!(m.candidates("missing.txt").is_none());
    }
}
