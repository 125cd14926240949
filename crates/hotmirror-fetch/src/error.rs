use std::fmt;

use hotmirror_core::manifest::CandidateUrl;
use thiserror::Error;

use crate::policy::Rejection;
use crate::transport::TransportError;

/// Why one candidate did not produce the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("rejected response: {0}")]
    Rejected(#[from] Rejection),
}

/// Diagnostic for one attempted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub candidate: CandidateUrl,
    pub reason: FailureReason,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}: {}",
            self.candidate.mirror_priority, self.candidate.url, self.reason
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Every candidate was attempted and none succeeded. `attempts` is in
    /// attempt order, one entry per candidate.
    #[error("all {} mirrors failed:\n{}", .attempts.len(), render(.attempts))]
    AllMirrorsFailed { attempts: Vec<AttemptFailure> },

    /// The caller cancelled. Candidates after the last entry were never tried.
    #[error("fetch cancelled after {} attempt(s){}", .attempts.len(), render_tail(.attempts))]
    Cancelled { attempts: Vec<AttemptFailure> },

    /// The overall deadline ran out. Candidates after the last entry were never tried.
    #[error("fetch deadline exceeded after {} attempt(s){}", .attempts.len(), render_tail(.attempts))]
    DeadlineExceeded { attempts: Vec<AttemptFailure> },

    #[error("manifest has no candidates for artifact '{0}'")]
    UnknownArtifact(String),
}

fn render(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("  {a}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tail(attempts: &[AttemptFailure]) -> String {
    if attempts.is_empty() {
        String::new()
    } else {
        format!(":\n{}", render(attempts))
    }
}
