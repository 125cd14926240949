//! The closed set of published output artifacts.
//!
//! Consumers hardcode these names; they never change across runs.

/// Directory (relative to the repository root) the artifacts are committed under.
pub const OUTPUT_DIR: &str = "output";

/// Plain-text hotwords list.
pub const LATEST_TEXT: LogicalArtifact = LogicalArtifact::new("hotwords_latest.txt");

/// JSON metadata for the latest list (digest, counts, provenance).
pub const LATEST_JSON: LogicalArtifact = LogicalArtifact::new("hotwords_latest.json");

/// Every artifact the endpoint manifest lists candidates for.
pub const ARTIFACTS: &[LogicalArtifact] = &[LATEST_TEXT, LATEST_JSON];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalArtifact {
    name: &'static str,
}

impl LogicalArtifact {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Path relative to the repository root, e.g. `output/hotwords_latest.txt`.
    pub fn repo_path(&self) -> String {
        format!("{}/{}", OUTPUT_DIR, self.name)
    }

    /// Look up a known artifact by file name.
    pub fn by_name(name: &str) -> Option<Self> {
        ARTIFACTS.iter().copied().find(|a| a.name == name)
    }
}

impl std::fmt::Display for LogicalArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_paths_live_under_output() {
        assert_eq!(LATEST_TEXT.repo_path(), "output/hotwords_latest.txt");
        assert_eq!(LATEST_JSON.repo_path(), "output/hotwords_latest.json");
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(LogicalArtifact::by_name("hotwords_latest.json"), Some(LATEST_JSON));
        assert_eq!(LogicalArtifact::by_name("hotwords_20250101.txt"), None);
    }
}
