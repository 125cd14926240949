//! Compiled-in mirror template registry.
//!
//! The table order *is* the fallback order: official/fast proxies first, the
//! jsDelivr CDN, the raw origin as the guaranteed non-proxy route, then the
//! supplementary proxies. Nothing re-sorts or deduplicates it at runtime.
//!
//! Consumers that hardcode their own list instead of reading the endpoint
//! manifest have to keep it in sync with this table by hand.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::origin::OriginIdentity;

/// Token replaced by the artifact's origin-relative path.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Host serving unmodified repository content.
pub const ORIGIN_HOST: &str = "raw.githubusercontent.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorKind {
    /// Third-party proxy or CDN re-serving origin content.
    Proxy,
    /// The origin host itself, no indirection.
    Direct,
}

/// How the origin-relative path is rendered before substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `owner/repo/ref/<artifact path>` (raw.githubusercontent.com layout).
    Raw,
    /// `owner/repo@ref/<artifact path>` (jsDelivr `gh/` layout).
    Jsdelivr,
}

impl PathStyle {
    pub fn render(self, origin: &OriginIdentity, artifact_path: &str) -> String {
        match self {
            PathStyle::Raw => format!(
                "{}/{}/{}/{}",
                origin.owner, origin.repo, origin.git_ref, artifact_path
            ),
            PathStyle::Jsdelivr => format!(
                "{}/{}@{}/{}",
                origin.owner, origin.repo, origin.git_ref, artifact_path
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorTemplate {
    /// Lower is tried first. Equal to the template's position in its registry.
    pub priority: usize,
    pub name: Cow<'static, str>,
    pub url_pattern: Cow<'static, str>,
    pub kind: MirrorKind,
    pub style: PathStyle,
}

impl MirrorTemplate {
    pub const fn proxy(
        priority: usize,
        name: &'static str,
        url_pattern: &'static str,
        style: PathStyle,
    ) -> Self {
        Self {
            priority,
            name: Cow::Borrowed(name),
            url_pattern: Cow::Borrowed(url_pattern),
            kind: MirrorKind::Proxy,
            style,
        }
    }

    pub const fn direct(priority: usize, name: &'static str, url_pattern: &'static str) -> Self {
        Self {
            priority,
            name: Cow::Borrowed(name),
            url_pattern: Cow::Borrowed(url_pattern),
            kind: MirrorKind::Direct,
            style: PathStyle::Raw,
        }
    }

    /// Runtime-built template (tests, consumers experimenting with their own lists).
    pub fn custom(
        priority: usize,
        name: impl Into<String>,
        url_pattern: impl Into<String>,
        kind: MirrorKind,
        style: PathStyle,
    ) -> Self {
        Self {
            priority,
            name: Cow::Owned(name.into()),
            url_pattern: Cow::Owned(url_pattern.into()),
            kind,
            style,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind == MirrorKind::Direct
    }

    /// Number of `{path}` tokens in the pattern.
    pub fn placeholder_count(&self) -> usize {
        self.url_pattern.matches(PATH_PLACEHOLDER).count()
    }
}

static REGISTRY: [MirrorTemplate; 6] = [
    MirrorTemplate::proxy(
        0,
        "gh-proxy",
        "https://gh-proxy.org/https://raw.githubusercontent.com/{path}",
        PathStyle::Raw,
    ),
    MirrorTemplate::proxy(
        1,
        "gh-proxy-hk",
        "https://hk.gh-proxy.org/https://raw.githubusercontent.com/{path}",
        PathStyle::Raw,
    ),
    MirrorTemplate::proxy(
        2,
        "jsdelivr",
        "https://cdn.jsdelivr.net/gh/{path}",
        PathStyle::Jsdelivr,
    ),
    MirrorTemplate::direct(3, "origin", "https://raw.githubusercontent.com/{path}"),
    MirrorTemplate::proxy(
        4,
        "gh-proxy-cdn",
        "https://cdn.gh-proxy.org/https://raw.githubusercontent.com/{path}",
        PathStyle::Raw,
    ),
    MirrorTemplate::proxy(
        5,
        "gh-proxy-edgeone",
        "https://edgeone.gh-proxy.org/https://raw.githubusercontent.com/{path}",
        PathStyle::Raw,
    ),
];

/// The fixed, ordered registry. Same slice on every call.
pub fn list_templates() -> &'static [MirrorTemplate] {
    &REGISTRY
}

/// The direct-origin entry of `templates`, if any.
pub fn direct_origin(templates: &[MirrorTemplate]) -> Option<&MirrorTemplate> {
    templates.iter().find(|t| t.is_direct())
}
