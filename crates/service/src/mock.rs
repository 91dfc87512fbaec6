//! Recording test doubles for the storefront seams, usable from tests and doc examples.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::graphql::{GraphqlRequest, StorefrontFetch};
use common::FetchError;
use serde_json::Value;

use crate::errors::CommerceError;
use crate::hook::Revalidate;
use crate::session::{MemorySessionStore, SessionStore};

/// Replays queued responses in order and records every request.
/// An exhausted queue answers with a network error.
#[derive(Default)]
pub struct RecordingFetch {
    responses: Mutex<VecDeque<Result<Value, FetchError>>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl RecordingFetch {
    pub fn with_responses(responses: Vec<Result<Value, FetchError>>) -> Self {
        Self { responses: Mutex::new(responses.into()), requests: Mutex::default() }
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorefrontFetch for RecordingFetch {
    async fn fetch(&self, request: GraphqlRequest) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no response queued".into())))
    }
}

/// In-memory session that also keeps every token it was handed.
#[derive(Default)]
pub struct RecordingSessionStore {
    inner: MemorySessionStore,
    tokens: Mutex<Vec<String>>,
}

impl RecordingSessionStore {
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn set_token(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), CommerceError> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.inner.set_token(token, expires_at).await
    }

    async fn token(&self) -> Option<String> {
        self.inner.token().await
    }

    async fn clear(&self) -> Result<(), CommerceError> {
        self.inner.clear().await
    }
}

/// Counts revalidation calls.
#[derive(Default)]
pub struct RecordingRevalidator {
    calls: Mutex<usize>,
}

impl RecordingRevalidator {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Revalidate for RecordingRevalidator {
    async fn revalidate(&self) -> Result<(), CommerceError> {
        *self.calls.lock().unwrap() += 1;
        Ok(())
    }
}
