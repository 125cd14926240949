//! Endpoint manifest persistence.
//!
//! The manifest is serialized in full and swapped in with an atomic replace,
//! so a consumer reading it concurrently never sees a torn document. Every run
//! overwrites the previous manifest; nothing is merged.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hotmirror_core::error::TemplateError;
use hotmirror_core::prelude::*;

use crate::error::Result;
use crate::store::Store;

/// Serialize `manifest` and atomically replace `destination` with it.
///
/// The manifest is checked with [`EndpointManifest::validate`] first, the same
/// check [`read_manifest`] applies, so nothing unreadable is ever written.
/// Filesystem failures are returned to the caller as-is; nothing is retried.
pub fn write_manifest(store: &dyn Store, manifest: &EndpointManifest, destination: &Path) -> Result<()> {
    manifest.validate()?;
    let mut json = manifest.to_json_pretty()?;
    json.push('\n');
    store.write_atomic(destination, json.as_bytes())?;
    tracing::info!(
        path = %destination.display(),
        origin = %manifest.origin,
        artifacts = manifest.artifacts.len(),
        "wrote endpoint manifest"
    );
    Ok(())
}

/// Read and validate a manifest previously written by [`write_manifest`].
pub fn read_manifest(store: &dyn Store, path: &Path) -> Result<EndpointManifest> {
    let bytes = store.read(path)?;
    Ok(EndpointManifest::from_slice(&bytes)?)
}

/// Outcome of one `generate` step.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub path: PathBuf,
    pub manifest: EndpointManifest,
    /// Templates that were dropped from every artifact's candidate list.
    pub skipped: Vec<TemplateError>,
}

/// Materialize the compiled-in registry for every published artifact and
/// write the manifest to `<output_dir>/hotwords_latest_endpoints.json`.
pub fn generate_manifest(
    store: &dyn Store,
    origin: &OriginIdentity,
    output_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<GenerateReport> {
    generate_with_templates(store, origin, list_templates(), output_dir, generated_at)
}

/// Same as [`generate_manifest`] with an explicit template list.
pub fn generate_with_templates(
    store: &dyn Store,
    origin: &OriginIdentity,
    templates: &[MirrorTemplate],
    output_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<GenerateReport> {
    let Materialized { artifacts, skipped } = materialize(origin, templates, ARTIFACTS);
    let manifest = EndpointManifest::new(origin.clone(), artifacts, generated_at);
    let path = output_dir.join(MANIFEST_FILE);
    write_manifest(store, &manifest, &path)?;
    Ok(GenerateReport {
        path,
        manifest,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;

    use super::*;
    use crate::store::{FsStore, MemoryStore};

    fn acme() -> OriginIdentity {
        OriginIdentity::new("acme", "hotwords", "main").unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn round_trip_preserves_ordered_urls() {
        let store = MemoryStore::new();
        let report = generate_manifest(&store, &acme(), Path::new("output"), at(8)).unwrap();
        assert_eq!(report.path, Path::new("output/hotwords_latest_endpoints.json"));
        assert!(report.skipped.is_empty());

        let back = read_manifest(&store, &report.path).unwrap();
        assert_eq!(back, report.manifest);
        for (name, candidates) in &report.manifest.artifacts {
            let urls: Vec<_> = candidates.iter().map(|c| &c.url).collect();
            let back_urls: Vec<_> = back.artifacts[name].iter().map(|c| &c.url).collect();
            assert_eq!(urls, back_urls);
        }
    }

    #[test]
    fn regeneration_overwrites_instead_of_merging() {
        let store = MemoryStore::new();
        let out = Path::new("output");
        generate_manifest(&store, &acme(), out, at(8)).unwrap();

        let moved = OriginIdentity::new("acme", "hotwords-data", "published").unwrap();
        let report = generate_manifest(&store, &moved, out, at(9)).unwrap();

        let back = read_manifest(&store, &report.path).unwrap();
        assert_eq!(back.origin, moved);
        assert_eq!(back.generated_at, at(9));
        let stale = back
            .artifacts
            .values()
            .flatten()
            .any(|c| c.url.contains("/acme/hotwords/main/"));
        assert!(!stale);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn skipped_templates_are_reported() {
        let store = MemoryStore::new();
        let templates = vec![
            MirrorTemplate::custom(0, "bad", "https://bad.example/", MirrorKind::Proxy, PathStyle::Raw),
            MirrorTemplate::custom(
                1,
                "origin",
                "https://raw.githubusercontent.com/{path}",
                MirrorKind::Direct,
                PathStyle::Raw,
            ),
        ];
        let report =
            generate_with_templates(&store, &acme(), &templates, Path::new("out"), at(8)).unwrap();
        assert_eq!(report.skipped.len(), 1);
        for candidates in report.manifest.artifacts.values() {
            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].mirror_priority, 1);
        }
    }

    #[test]
    fn artifact_without_candidates_is_not_written() {
        let store = MemoryStore::new();
        let templates = vec![MirrorTemplate::custom(
            0,
            "bad",
            "https://bad.example/",
            MirrorKind::Proxy,
            PathStyle::Raw,
        )];
        let err = generate_with_templates(&store, &acme(), &templates, Path::new("out"), at(8))
            .unwrap_err();
        assert!(err.to_string().contains("has no candidates"), "got {err}");
        assert!(store.is_empty());
    }

    #[test]
    fn write_then_read_agree_on_validity() {
        let store = MemoryStore::new();
        let path = Path::new("out/endpoints.json");
        let mut artifacts = BTreeMap::new();
        artifacts.insert(
            "hotwords_latest.txt".to_string(),
            vec![
                CandidateUrl::new(1, "https://b.example/x"),
                CandidateUrl::new(0, "https://a.example/x"),
            ],
        );
        let unordered = EndpointManifest::new(acme(), artifacts, at(8));
        assert!(write_manifest(&store, &unordered, path).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn manifest_with_invalid_utf8_is_rejected() {
        let store = MemoryStore::new();
        store.insert("out/endpoints.json", vec![b'{', 0xff, 0xfe, b'}']);
        assert!(read_manifest(&store, Path::new("out/endpoints.json")).is_err());
    }

    #[test]
    fn writes_to_disk_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new();
        let report = generate_manifest(&store, &acme(), dir.path(), at(8)).unwrap();
        let text = std::fs::read_to_string(&report.path).unwrap();
        assert!(text.ends_with('\n'));
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["origin"]["repo"], "hotwords");
        assert_eq!(v["artifacts"]["hotwords_latest.txt"].as_array().unwrap().len(), 6);
    }
}
