//! The "valid response" predicate.
//!
//! Third-party mirrors sometimes answer 200 with an empty body or an HTML
//! error page. What counts as success is configuration, not a constant.

use std::ops::RangeInclusive;

use hotmirror_core::config::FetchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::HttpResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePolicy {
    /// Inclusive status range treated as success.
    pub accept_status: (u16, u16),
    pub min_body_bytes: usize,
    /// Require the body to parse as JSON (for `.json` artifacts).
    pub require_json: bool,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self {
            accept_status: (200, 299),
            min_body_bytes: 1,
            require_json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("status {status} outside accepted range {lo}-{hi}")]
    Status { status: u16, lo: u16, hi: u16 },

    #[error("body of {len} bytes is shorter than the required {min}")]
    BodyTooShort { len: usize, min: usize },

    #[error("body is not valid JSON: {0}")]
    NotJson(String),
}

impl ResponsePolicy {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self {
            accept_status: cfg.accept_status,
            min_body_bytes: cfg.min_body_bytes,
            require_json: false,
        }
    }

    pub fn with_json(mut self, require_json: bool) -> Self {
        self.require_json = require_json;
        self
    }

    fn status_range(&self) -> RangeInclusive<u16> {
        self.accept_status.0..=self.accept_status.1
    }

    pub fn check(&self, resp: &HttpResponse) -> Result<(), Rejection> {
        if !self.status_range().contains(&resp.status) {
            return Err(Rejection::Status {
                status: resp.status,
                lo: self.accept_status.0,
                hi: self.accept_status.1,
            });
        }
        if resp.body.len() < self.min_body_bytes {
            return Err(Rejection::BodyTooShort {
                len: resp.body.len(),
                min: self.min_body_bytes,
            });
        }
        if self.require_json {
            serde_json::from_slice::<serde_json::Value>(&resp.body)
                .map_err(|e| Rejection::NotJson(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_non_empty_2xx() {
        let p = ResponsePolicy::default();
        assert!(p.check(&HttpResponse::new(200, "x")).is_ok());
        assert!(p.check(&HttpResponse::new(204, "x")).is_ok());
        assert_eq!(
            p.check(&HttpResponse::new(404, "not found")),
            Err(Rejection::Status { status: 404, lo: 200, hi: 299 })
        );
        assert_eq!(
            p.check(&HttpResponse::new(200, "")),
            Err(Rejection::BodyTooShort { len: 0, min: 1 })
        );
    }

    #[test]
    fn json_check_catches_html_error_pages() {
        let p = ResponsePolicy::default().with_json(true);
        assert!(p.check(&HttpResponse::new(200, r#"{"sha256":"ab"}"#)).is_ok());
        assert!(matches!(
            p.check(&HttpResponse::new(200, "<html>blocked</html>")),
            Err(Rejection::NotJson(_))
        ));
    }

    #[test]
    fn built_from_config() {
        let cfg = FetchConfig {
            min_body_bytes: 16,
            accept_status: (200, 200),
            ..FetchConfig::default()
        };
        let p = ResponsePolicy::from_config(&cfg);
        assert!(p.check(&HttpResponse::new(203, vec![b'a'; 32])).is_err());
        assert!(p.check(&HttpResponse::new(200, vec![b'a'; 8])).is_err());
        assert!(p.check(&HttpResponse::new(200, vec![b'a'; 16])).is_ok());
    }
}
