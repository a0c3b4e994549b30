use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reqwest::blocking::Client;
use std::cell::OnceCell;

/// Fetches a release asset fully into memory.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Plain HTTPS downloads; no retries, no authentication.
///
/// The client (and its TLS setup) is built on the first request.
#[derive(Default)]
pub struct HttpFetcher {
    client: OnceCell<Client>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a client has been built yet.
    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .user_agent(concat!("ciprep/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Network("HTTP client initialization".to_string()))?;
        tracing::trace!("HTTP client initialized");
        Ok(self.client.get_or_init(|| client))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(%url, "Sending request");
        let response = self.client()?.get(url).send().or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }
        let body = response.bytes().or_raise(|| ErrorKind::Network(url.to_string()))?;
        tracing::debug!(size = body.len(), "Response received");
        Ok(body.to_vec())
    }
}
