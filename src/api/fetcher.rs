//! The fetch collaborator: anything that can turn a URL into bytes.
//!
//! [`HttpFetcher`] is the default implementation. It owns a single blocking
//! `reqwest` client for the lifetime of the process, shared by every request.

use crate::api::error::FetchError;
use log::{info, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

impl<F: Fetch + ?Sized> Fetch for Box<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Fetches `url` and decodes the body as JSON.
pub fn fetch_json<T, F>(fetcher: &F, url: &str) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    F: Fetch + ?Sized,
{
    let bytes = fetcher.fetch(url)?;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(url.to_string(), e))
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading data from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .bytes()
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
