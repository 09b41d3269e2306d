//! Upstream Gateway
//!
//! One network call per request with a fixed timeout. No retries.

use openmcp_core::{normalize, Envelope};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, UpstreamError};

/// Shared HTTP client for every provider. Cloning is cheap.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    timeout: Duration,
}

impl Gateway {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET and parse a JSON body. Non-2xx statuses are errors.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url = %url, "Upstream GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn get_json_with_query<Q>(&self, url: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        debug!(url = %url, "Upstream GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// GET and parse a JSON body whatever the status, for providers that
    /// describe their failures in the body of a 4xx response
    pub async fn get_json_any_status<Q>(&self, url: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        debug!(url = %url, "Upstream GET");
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|_| {
            UpstreamError::invalid_response(format!("status {} with non-JSON body", status))
        })
    }

    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        debug!(url = %url, "Upstream POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// GET `url`, returning the raw body on success and a failure envelope
    /// describing the transport or status error otherwise
    pub async fn fetch(&self, url: &str) -> std::result::Result<Value, Envelope> {
        self.get_json(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Upstream call failed");
            Envelope::upstream_failure(e)
        })
    }

    /// [`fetch`](Self::fetch) followed by normalization
    pub async fn fetch_envelope(&self, url: &str) -> Envelope {
        match self.fetch(url).await {
            Ok(raw) => normalize(&raw),
            Err(failure) => failure,
        }
    }
}
