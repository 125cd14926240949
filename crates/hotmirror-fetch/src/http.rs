use std::time::Duration;

use reqwest::blocking::Client;

use crate::transport::{HttpResponse, Transport, TransportError};

/// [`Transport`] over reqwest's blocking client.
///
/// Redirects are followed by the client; the per-call timeout covers the
/// whole request including the body read.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(format!("hotmirror/{}", hotmirror_core::VERSION))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| classify(e, timeout))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(|e| classify(e, timeout))?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
