//! The "perform one HTTP GET" primitive the fetcher sits on.

use std::time::Duration;

use thiserror::Error;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Performs a single GET, giving up after `timeout`.
///
/// Implementations must not retry internally: one call is one attempt.
pub trait Transport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        (**self).get(url, timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        (**self).get(url, timeout)
    }
}

/// Scripted transport for tests: answers by URL and records every call.
pub mod scripted {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::{HttpResponse, Transport, TransportError};

    type Hook = Box<dyn Fn(&str) + Send + Sync>;

    #[derive(Default)]
    pub struct ScriptedTransport {
        routes: HashMap<String, Result<HttpResponse, TransportError>>,
        calls: Mutex<Vec<(String, Duration)>>,
        on_call: Option<Hook>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `url` with `status` and `body`.
        pub fn respond(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.routes
                .insert(url.to_string(), Ok(HttpResponse::new(status, body)));
            self
        }

        /// Fail `url` at the transport level.
        pub fn fail(mut self, url: &str, err: TransportError) -> Self {
            self.routes.insert(url.to_string(), Err(err));
            self
        }

        /// Run `hook` at the start of every call (e.g. to flip a cancel flag).
        pub fn on_call(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
            self.on_call = Some(Box::new(hook));
            self
        }

        /// URLs requested so far, in order.
        pub fn requested(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|c| c.iter().map(|(u, _)| u.clone()).collect())
                .unwrap_or_default()
        }

        /// Timeouts passed to each call, in order.
        pub fn timeouts(&self) -> Vec<Duration> {
            self.calls
                .lock()
                .map(|c| c.iter().map(|(_, t)| *t).collect())
                .unwrap_or_default()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((url.to_string(), timeout));
            }
            if let Some(hook) = &self.on_call {
                hook(url);
            }
            self.routes
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Connect(format!("no route to {url}"))))
        }
    }
}
