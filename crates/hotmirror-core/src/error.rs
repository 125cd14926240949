use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

/// A single mirror template could not be turned into a candidate URL.
///
/// Only the offending template's candidate is dropped; materialization of the
/// remaining templates carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template #{priority} '{pattern}' has no {{path}} placeholder")]
    MissingPlaceholder { priority: usize, pattern: String },

    #[error("template #{priority} '{pattern}' has {count} {{path}} placeholders, expected exactly one")]
    RepeatedPlaceholder {
        priority: usize,
        pattern: String,
        count: usize,
    },

    #[error("template #{priority} '{pattern}' is malformed: {reason}")]
    Malformed {
        priority: usize,
        pattern: String,
        reason: String,
    },
}

impl TemplateError {
    /// Registry position of the template that failed.
    pub fn priority(&self) -> usize {
        match self {
            TemplateError::MissingPlaceholder { priority, .. }
            | TemplateError::RepeatedPlaceholder { priority, .. }
            | TemplateError::Malformed { priority, .. } => *priority,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Invariant(e.to_string())
    }
}
