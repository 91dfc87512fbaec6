//! Storefront GraphQL transport.
//!
//! `StorefrontFetch` is the seam the service layer talks to; `ShopifyFetcher`
//! is the reqwest-backed implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::FetchError;

/// Header carrying the public storefront access token.
pub const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// A single GraphQL operation: document plus variables.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self { query: query.into(), variables }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Executes GraphQL operations against the storefront and yields the `data` object.
#[async_trait]
pub trait StorefrontFetch: Send + Sync {
    async fn fetch(&self, request: GraphqlRequest) -> Result<Value, FetchError>;
}

/// Decode a `data` payload into a typed response.
pub fn decode<T: DeserializeOwned>(data: Value) -> Result<T, FetchError> {
    serde_json::from_value(data).map_err(|e| FetchError::Parse(e.to_string()))
}

/// reqwest-backed storefront client.
#[derive(Clone)]
pub struct ShopifyFetcher {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl ShopifyFetcher {
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into(), access_token: access_token.into() })
    }
}

#[async_trait]
impl StorefrontFetch for ShopifyFetcher {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, request: GraphqlRequest) -> Result<Value, FetchError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(STOREFRONT_TOKEN_HEADER, &self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "storefront returned non-success status");
            return Err(FetchError::Status { status: status.as_u16(), body });
        }

        let envelope = resp
            .json::<GraphqlEnvelope>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let joined = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::Graphql(joined));
        }

        debug!("storefront request completed");
        envelope
            .data
            .ok_or_else(|| FetchError::Parse("response has no data".into()))
    }
}
