//! Origin identity: the canonical repository/branch that hosts the real files.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Combined `owner/repo` identifier set by the publishing job.
pub const REPO_KEY: &str = "HOTWORDS_PUBLISH_REPO";
/// Branch or ref the artifacts are committed to.
pub const REF_KEY: &str = "HOTWORDS_PUBLISH_REF";
/// CI-injected fallbacks, consulted when the explicit keys are absent.
pub const CI_REPO_KEY: &str = "GITHUB_REPOSITORY";
pub const CI_REF_KEY: &str = "GITHUB_REF_NAME";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginIdentity {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl OriginIdentity {
    /// Build an identity from already-split parts, applying the same checks as [`resolve`].
    ///
    /// [`resolve`]: OriginIdentity::resolve
    pub fn new(owner: &str, repo: &str, git_ref: &str) -> Result<Self> {
        let owner = owner.trim();
        let repo = repo.trim();
        let git_ref = git_ref.trim();
        if owner.is_empty() || repo.is_empty() {
            return Err(Error::Config(format!(
                "origin owner and repo must be non-empty (got '{owner}/{repo}')"
            )));
        }
        if owner.contains('/') || repo.contains('/') {
            return Err(Error::Config(format!(
                "origin owner/repo must not contain '/' (got '{owner}', '{repo}')"
            )));
        }
        if git_ref.is_empty() {
            return Err(Error::Config("origin ref must be non-empty".into()));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.to_string(),
        })
    }

    /// Resolve the origin from environment-style key/value pairs.
    ///
    /// Reads [`REPO_KEY`] (falling back to [`CI_REPO_KEY`]) and [`REF_KEY`]
    /// (falling back to [`CI_REF_KEY`]). Blank values count as absent.
    pub fn resolve(env: &HashMap<String, String>) -> Result<Self> {
        let combined = lookup(env, &[REPO_KEY, CI_REPO_KEY]).ok_or_else(|| {
            Error::Config(format!("missing origin repository: set {REPO_KEY}=owner/repo"))
        })?;
        let git_ref = lookup(env, &[REF_KEY, CI_REF_KEY])
            .ok_or_else(|| Error::Config(format!("missing origin ref: set {REF_KEY}")))?;

        let (owner, repo) = split_combined(combined)?;
        Self::new(owner, repo, git_ref)
    }

    /// Resolve from the current process environment.
    pub fn from_env() -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(&env)
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for OriginIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.git_ref)
    }
}

fn lookup<'a>(env: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| env.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn split_combined(combined: &str) -> Result<(&str, &str)> {
    let mut parts = combined.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.trim().is_empty() && !repo.trim().is_empty() => {
            Ok((owner, repo))
        }
        _ => Err(Error::Config(format!(
            "origin repository '{combined}' must have the form owner/repo"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_explicit_keys() {
        let origin = OriginIdentity::resolve(&env(&[
            (REPO_KEY, "acme/hotwords"),
            (REF_KEY, "main"),
        ]))
        .unwrap();
        assert_eq!(origin.owner, "acme");
        assert_eq!(origin.repo, "hotwords");
        assert_eq!(origin.git_ref, "main");
        assert_eq!(origin.to_string(), "acme/hotwords@main");
    }

    #[test]
    fn falls_back_to_ci_keys() {
        let origin = OriginIdentity::resolve(&env(&[
            (CI_REPO_KEY, "acme/hotwords"),
            (CI_REF_KEY, "release"),
        ]))
        .unwrap();
        assert_eq!(origin.slug(), "acme/hotwords");
        assert_eq!(origin.git_ref, "release");
    }

    #[test]
    fn explicit_keys_win_over_ci_keys() {
        let origin = OriginIdentity::resolve(&env(&[
            (REPO_KEY, "acme/hotwords"),
            (CI_REPO_KEY, "fork/hotwords"),
            (REF_KEY, "main"),
            (CI_REF_KEY, "feature"),
        ]))
        .unwrap();
        assert_eq!(origin.owner, "acme");
        assert_eq!(origin.git_ref, "main");
    }

    #[test]
    fn blank_values_count_as_absent() {
        let origin = OriginIdentity::resolve(&env(&[
            (REPO_KEY, "   "),
            (CI_REPO_KEY, "acme/hotwords"),
            (REF_KEY, "main"),
        ]))
        .unwrap();
        assert_eq!(origin.owner, "acme");
    }

    #[test]
    fn missing_keys_are_config_errors() {
        let err = OriginIdentity::resolve(&env(&[(REF_KEY, "main")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = OriginIdentity::resolve(&env(&[(REPO_KEY, "acme/hotwords")])).unwrap_err();
        assert!(err.to_string().contains(REF_KEY));
    }

    #[test]
    fn malformed_combined_identifier_is_rejected() {
        for bad in ["acme", "acme/", "/hotwords", "acme/hot/words", "/"] {
            let err = OriginIdentity::resolve(&env(&[(REPO_KEY, bad), (REF_KEY, "main")]))
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{bad} should be rejected");
        }
    }

    #[test]
    fn serializes_ref_field_name() {
        let origin = OriginIdentity::new("acme", "hotwords", "main").unwrap();
        let v = serde_json::to_value(&origin).unwrap();
        assert_eq!(v["ref"], "main");
        assert_eq!(v["owner"], "acme");
    }
}
