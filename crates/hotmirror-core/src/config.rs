//! Run configuration that downstream crates can serialize/deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::artifact::OUTPUT_DIR;

/// Consumer-side fetch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Upper bound for a single candidate attempt.
    pub attempt_timeout_ms: u64,

    /// Optional budget for the whole resolution cycle. Once spent, no further
    /// candidates are tried and the in-flight attempt is cut short.
    pub deadline_ms: Option<u64>,

    /// Bodies shorter than this are treated as a misbehaving mirror.
    pub min_body_bytes: usize,

    /// Inclusive range of HTTP statuses counted as success.
    pub accept_status: (u16, u16),
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 10_000,
            deadline_ms: None,
            min_body_bytes: 1,
            accept_status: (200, 299),
        }
    }
}

impl FetchConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `HOTMIRROR_ATTEMPT_TIMEOUT_MS`: per-candidate timeout
    /// - `HOTMIRROR_DEADLINE_MS`: overall deadline for one fetch
    /// - `HOTMIRROR_MIN_BODY_BYTES`: minimum acceptable body size
    /// - `HOTMIRROR_ACCEPT_STATUS`: accepted status range, `lo-hi`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("HOTMIRROR_ATTEMPT_TIMEOUT_MS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.attempt_timeout_ms = v;
            }
        }

        if let Ok(s) = std::env::var("HOTMIRROR_DEADLINE_MS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.deadline_ms = Some(v);
            }
        }

        if let Ok(s) = std::env::var("HOTMIRROR_MIN_BODY_BYTES") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.min_body_bytes = v;
            }
        }

        if let Ok(s) = std::env::var("HOTMIRROR_ACCEPT_STATUS") {
            if let Some(range) = parse_status_range(&s) {
                cfg.accept_status = range;
            }
        }

        cfg
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Parse `lo-hi` (or a single status) into an inclusive range.
pub fn parse_status_range(s: &str) -> Option<(u16, u16)> {
    let s = s.trim();
    let (lo, hi) = match s.split_once('-') {
        Some((lo, hi)) => (lo.trim().parse().ok()?, hi.trim().parse().ok()?),
        None => {
            let v = s.parse().ok()?;
            (v, v)
        }
    };
    (lo <= hi && (100..=599).contains(&lo) && hi <= 599).then_some((lo, hi))
}

/// Publisher-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Directory the primary artifacts and the endpoint manifest are written to.
    pub output_dir: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            output_dir: OUTPUT_DIR.to_string(),
        }
    }
}

impl PublishConfig {
    /// `HOTMIRROR_OUTPUT_DIR` overrides the default `output`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(s) = std::env::var("HOTMIRROR_OUTPUT_DIR") {
            if !s.trim().is_empty() {
                cfg.output_dir = s;
            }
        }
        cfg
    }
}
