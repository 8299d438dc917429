//! Fetch gateway: one POST per issued request, no retries.

use async_trait::async_trait;
use reqwest::{header, Client};
use shared::{
    error::TableError,
    protocol::{FetchRequest, FetchResponseBody, TablePage},
};
use tracing::{debug, warn};
use url::Url;

/// Longest server error body kept in a [`TableError::Status`].
const MAX_ERROR_BODY: usize = 256;

#[async_trait]
pub trait FetchGateway: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<TablePage, TableError>;
}

pub struct HttpFetchGateway {
    http: Client,
    endpoint: Url,
}

impl HttpFetchGateway {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    async fn post(&self, request: &FetchRequest) -> Result<TablePage, TableError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .header(header::CACHE_CONTROL, "no-cache")
            .json(&request.body)
            .send()
            .await
            .map_err(|err| TableError::network(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let mut message = res.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|idx| message.is_char_boundary(*idx))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(TableError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|err| TableError::network(err.to_string()))?;
        let body: FetchResponseBody = serde_json::from_slice(&bytes)?;
        Ok(body.into())
    }
}

#[async_trait]
impl FetchGateway for HttpFetchGateway {
    async fn fetch(&self, request: &FetchRequest) -> Result<TablePage, TableError> {
        debug!(
            endpoint = %self.endpoint,
            request_id = request.request_id.0,
            "posting table fetch"
        );
        let outcome = self.post(request).await;
        if let Err(err) = &outcome {
            warn!(
                endpoint = %self.endpoint,
                request_id = request.request_id.0,
                kind = ?err.kind(),
                "table fetch failed: {err}"
            );
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
