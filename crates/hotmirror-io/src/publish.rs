//! Stable publishing of the latest hotwords list.
//!
//! After each collection run the merged list is republished under fixed names
//! that consumers hardcode:
//! - `hotwords_latest.txt`: the list itself, one `【category】:[w1,w2,...]` line
//!   per non-empty category;
//! - `hotwords_latest.json`: digest and counts for the text file;
//! - `hotwords_latest_endpoints.json`: mirror candidates for both.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use hotmirror_core::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::endpoints::{generate_manifest, GenerateReport};
use crate::error::{Error, Result};
use crate::store::Store;

/// Parsed hotwords list, categories in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotwordsList {
    pub categories: Vec<(String, Vec<String>)>,
}

impl HotwordsList {
    /// Parse the `【category】:[w1,w2,...]` line format. Lines that do not match
    /// are ignored.
    pub fn parse(text: &str) -> Self {
        let mut categories = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match parse_line(line) {
                Some(entry) => categories.push(entry),
                None => tracing::debug!(line, "ignoring unrecognised hotwords line"),
            }
        }
        Self { categories }
    }

    pub fn total_terms(&self) -> usize {
        self.categories.iter().map(|(_, words)| words.len()).sum()
    }

    pub fn non_empty_categories(&self) -> usize {
        self.categories.iter().filter(|(_, words)| !words.is_empty()).count()
    }

    /// Canonical rendering; empty categories are left out.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (category, words) in self.categories.iter().filter(|(_, w)| !w.is_empty()) {
            out.push('【');
            out.push_str(category);
            out.push_str("】:[");
            out.push_str(&words.join(","));
            out.push_str("]\n");
        }
        out
    }
}

fn parse_line(line: &str) -> Option<(String, Vec<String>)> {
    let rest = line.strip_prefix('【')?;
    let (category, rest) = rest.split_once('】')?;
    let inner = rest.strip_prefix(":[")?.strip_suffix(']')?;
    if category.is_empty() {
        return None;
    }
    let words = inner
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    Some((category.to_string(), words))
}

/// Contents of `hotwords_latest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestMeta {
    pub generated_at: String,
    pub source_hotwords: String,
    pub snapshot_file: String,
    pub latest_file: String,
    pub sha256: String,
    pub total_terms: usize,
    pub non_empty_categories: usize,
}

#[derive(Debug, Clone)]
pub struct PublishReport {
    pub latest_text: PathBuf,
    pub latest_meta: PathBuf,
    pub meta: LatestMeta,
    pub endpoints: GenerateReport,
}

/// Republish `snapshot` as the stable latest artifacts in `output_dir`, then
/// regenerate the endpoint manifest for `origin`.
///
/// `source_hotwords` is recorded for provenance only (the master list the
/// snapshot was merged from). Any write failure aborts the run.
pub fn publish_latest(
    store: &dyn Store,
    snapshot: &Path,
    source_hotwords: &str,
    output_dir: &Path,
    origin: &OriginIdentity,
    generated_at: DateTime<Utc>,
) -> Result<PublishReport> {
    let raw = store.read(snapshot)?;
    let raw = String::from_utf8(raw).map_err(|source| Error::Utf8 {
        path: snapshot.to_path_buf(),
        source,
    })?;
    let list = HotwordsList::parse(&raw);
    let text = list.render();

    let latest_text = output_dir.join(LATEST_TEXT.name());
    store.write_atomic(&latest_text, text.as_bytes())?;

    let meta = LatestMeta {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        source_hotwords: source_hotwords.to_string(),
        snapshot_file: file_name(snapshot),
        latest_file: LATEST_TEXT.name().to_string(),
        sha256: hex::encode(Sha256::digest(text.as_bytes())),
        total_terms: list.total_terms(),
        non_empty_categories: list.non_empty_categories(),
    };
    let latest_meta = output_dir.join(LATEST_JSON.name());
    let mut json = serde_json::to_string_pretty(&meta)?;
    json.push('\n');
    store.write_atomic(&latest_meta, json.as_bytes())?;

    tracing::info!(
        path = %latest_text.display(),
        terms = meta.total_terms,
        categories = meta.non_empty_categories,
        sha256 = %meta.sha256,
        "published latest hotwords"
    );

    let endpoints = generate_manifest(store, origin, output_dir, generated_at)?;

    Ok(PublishReport {
        latest_text,
        latest_meta,
        meta,
        endpoints,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
