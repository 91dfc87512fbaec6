//! Generic mutation hook contract.
//!
//! A handler owns its request template (`FetchOptions`) and a `fetcher` that
//! turns caller input into one storefront request. Callers bind a handler to a
//! transport and a revalidation capability to get a ready-to-call hook.

use async_trait::async_trait;
use common::graphql::{GraphqlRequest, StorefrontFetch};
use serde_json::Value;

use crate::errors::CommerceError;

/// Request template shared by every call of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub query: &'static str,
}

impl FetchOptions {
    /// Build a request from this template and per-call variables.
    pub fn request(&self, variables: Value) -> GraphqlRequest {
        GraphqlRequest::new(self.query, variables)
    }
}

/// Everything a `fetcher` receives for one call.
pub struct FetcherContext<'a, I> {
    pub input: I,
    pub options: &'a FetchOptions,
    pub fetch: &'a dyn StorefrontFetch,
}

#[async_trait]
pub trait MutationHook: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn fetch_options(&self) -> &FetchOptions;

    async fn fetcher(&self, ctx: FetcherContext<'_, Self::Input>) -> Result<Self::Output, CommerceError>;
}

/// Refreshes cached data after a state-changing mutation.
#[async_trait]
pub trait Revalidate: Send + Sync {
    async fn revalidate(&self) -> Result<(), CommerceError>;
}

/// For callers that keep no cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRevalidator;

#[async_trait]
impl Revalidate for NoopRevalidator {
    async fn revalidate(&self) -> Result<(), CommerceError> {
        Ok(())
    }
}
