//! Ordered-fallback fetch loop.
//!
//! For the candidate at the current index, make one bounded attempt:
//! - accepted response: stop and return the body with the candidate that served it;
//! - timeout, transport failure or rejected response: record it and move on;
//! - past the last candidate: fail with every recorded diagnostic.
//!
//! No candidate is attempted twice and none is attempted after a success,
//! a cancellation, or an expired deadline.

use std::time::{Duration, Instant};

use hotmirror_core::config::FetchConfig;
use hotmirror_core::manifest::{CandidateUrl, EndpointManifest};

use crate::cancel::CancelFlag;
use crate::error::{AttemptFailure, FailureReason, FetchError};
use crate::policy::ResponsePolicy;
use crate::transport::Transport;

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    /// The candidate that served `bytes`.
    pub candidate: CandidateUrl,
    /// Candidates that failed before it, in attempt order.
    pub failed: Vec<AttemptFailure>,
}

pub struct Fetcher<T> {
    transport: T,
    policy: ResponsePolicy,
    attempt_timeout: Duration,
    deadline: Option<Duration>,
    cancel: Option<CancelFlag>,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, attempt_timeout: Duration) -> Self {
        Self {
            transport,
            policy: ResponsePolicy::default(),
            attempt_timeout,
            deadline: None,
            cancel: None,
        }
    }

    pub fn from_config(transport: T, cfg: &FetchConfig) -> Self {
        let mut fetcher = Self::new(transport, cfg.attempt_timeout());
        fetcher.policy = ResponsePolicy::from_config(cfg);
        fetcher.deadline = cfg.deadline();
        fetcher
    }

    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Budget for a whole `fetch` call. Each attempt's timeout is clamped to
    /// what is left of it.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }

    /// Try `candidates` strictly in the given order until one is accepted.
    pub fn fetch(&self, candidates: &[CandidateUrl]) -> Result<Fetched, FetchError> {
        self.fetch_with_policy(candidates, &self.policy)
    }

    /// Resolve `artifact` from a manifest. JSON artifacts must also parse as JSON.
    pub fn fetch_from_manifest(
        &self,
        manifest: &EndpointManifest,
        artifact: &str,
    ) -> Result<Fetched, FetchError> {
        let candidates = manifest
            .candidates(artifact)
            .ok_or_else(|| FetchError::UnknownArtifact(artifact.to_string()))?;
        let policy = self
            .policy
            .clone()
            .with_json(self.policy.require_json || artifact.ends_with(".json"));
        self.fetch_with_policy(candidates, &policy)
    }

    fn fetch_with_policy(
        &self,
        candidates: &[CandidateUrl],
        policy: &ResponsePolicy,
    ) -> Result<Fetched, FetchError> {
        let started = Instant::now();
        let mut failed: Vec<AttemptFailure> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if self.cancelled() {
                tracing::info!(attempted = failed.len(), "fetch cancelled");
                return Err(FetchError::Cancelled { attempts: failed });
            }

            let timeout = match self.deadline {
                Some(total) => {
                    let remaining = total.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        tracing::warn!(attempted = failed.len(), "fetch deadline exceeded");
                        return Err(FetchError::DeadlineExceeded { attempts: failed });
                    }
                    remaining.min(self.attempt_timeout)
                }
                None => self.attempt_timeout,
            };

            tracing::debug!(
                priority = candidate.mirror_priority,
                url = %candidate.url,
                timeout_ms = timeout.as_millis() as u64,
                "trying candidate"
            );

            let outcome = self
                .transport
                .get(&candidate.url, timeout)
                .map_err(FailureReason::from)
                .and_then(|resp| {
                    policy
                        .check(&resp)
                        .map(|_| resp)
                        .map_err(FailureReason::from)
                });

            // The in-flight request cannot be interrupted; a cancel that landed
            // meanwhile voids its result.
            if self.cancelled() {
                if let Err(reason) = outcome {
                    failed.push(AttemptFailure {
                        candidate: candidate.clone(),
                        reason,
                    });
                }
                tracing::info!(attempted = failed.len(), "fetch cancelled");
                return Err(FetchError::Cancelled { attempts: failed });
            }

            match outcome {
                Ok(resp) => {
                    tracing::info!(
                        priority = candidate.mirror_priority,
                        url = %candidate.url,
                        bytes = resp.body.len(),
                        skipped = failed.len(),
                        "fetched"
                    );
                    return Ok(Fetched {
                        bytes: resp.body,
                        candidate: candidate.clone(),
                        failed,
                    });
                }
                Err(reason) => {
                    tracing::warn!(
                        priority = candidate.mirror_priority,
                        url = %candidate.url,
                        error = %reason,
                        "candidate failed"
                    );
                    failed.push(AttemptFailure {
                        candidate: candidate.clone(),
                        reason,
                    });
                }
            }
        }

        Err(FetchError::AllMirrorsFailed { attempts: failed })
    }
}

/// Move the candidate with `priority` to the front, keeping the rest in order.
///
/// This is how a consumer tries its last known-good mirror first. Unknown
/// priorities leave the list unchanged.
pub fn prefer_priority(candidates: &[CandidateUrl], priority: usize) -> Vec<CandidateUrl> {
    let Some(preferred) = candidates.iter().find(|c| c.mirror_priority == priority) else {
        return candidates.to_vec();
    };
    let mut out = Vec::with_capacity(candidates.len());
    out.push(preferred.clone());
    out.extend(
        candidates
            .iter()
            .filter(|c| c.mirror_priority != priority)
            .cloned(),
    );
    out
}
