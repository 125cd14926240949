use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation switch for one or more fetches.
///
/// Checked before every attempt and again when an attempt returns; once set,
/// a fetch stops without touching any further candidate.
///
/// Transports are blocking, so the flag cannot interrupt a request already on
/// the wire. That request runs until it completes or hits its timeout, and its
/// result is then discarded, success included. To bound how long a cancel can
/// take to land, pair the flag with a deadline ([`Fetcher::with_deadline`]) or
/// a short per-attempt timeout.
///
/// [`Fetcher::with_deadline`]: crate::Fetcher::with_deadline
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
