//! HTTP loader for the aggregation API.
//!
//! `ApiLoader` is the seam between the orchestration layer and the network:
//! the real implementation wraps reqwest, tests substitute a stub. The
//! loader performs exactly one attempt per call — retry policy lives with
//! the revalidation pollers, not here.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;
use crate::filters::RequestDescriptor;

/// Performs the network call for a request descriptor.
#[async_trait]
pub trait ApiLoader: Send + Sync {
    async fn load(&self, request: &RequestDescriptor) -> Result<Value, FetchError>;
}

/// reqwest-backed loader pointed at the configured API base address.
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    /// Build a fetcher for a base address like
    /// `https://sales-api.example.com`.
    pub fn new(base_url: &str) -> Result<Self, String> {
        let base = Url::parse(base_url).map_err(|e| format!("Invalid API base URL: {}", e))?;
        Ok(HttpFetcher {
            client: reqwest::Client::new(),
            base,
        })
    }

    fn request_url(&self, request: &RequestDescriptor) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join(request.endpoint)
            .map_err(|e| FetchError::Network(format!("bad endpoint path: {}", e)))?;
        if !request.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ApiLoader for HttpFetcher {
    async fn load(&self, request: &RequestDescriptor) -> Result<Value, FetchError> {
        let url = self.request_url(request)?;
        log::debug!("fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "{} returned {}",
                request.endpoint, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            FetchError::Malformed(format!("{}: {}", request.endpoint, e))
        })
    }
}
