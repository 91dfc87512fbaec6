//! Cached customer profile, refreshed after session changes.

use std::sync::Arc;

use async_trait::async_trait;
use common::graphql::{decode, GraphqlRequest, StorefrontFetch};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::errors::CommerceError;
use crate::hook::Revalidate;
use crate::session::SessionStore;

pub const GET_CUSTOMER: &str = r#"
query getCustomer($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    id
    firstName
    lastName
    displayName
    email
    phone
    acceptsMarketing
  }
}
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub accepts_marketing: bool,
}

#[derive(Debug, Deserialize)]
struct CustomerQueryData {
    customer: Option<Customer>,
}

/// Keeps the signed-in customer's profile in sync with the session store.
pub struct CustomerRevalidator {
    fetch: Arc<dyn StorefrontFetch>,
    session: Arc<dyn SessionStore>,
    cached: RwLock<Option<Customer>>,
}

impl CustomerRevalidator {
    pub fn new(fetch: Arc<dyn StorefrontFetch>, session: Arc<dyn SessionStore>) -> Self {
        Self { fetch, session, cached: RwLock::new(None) }
    }

    /// Last fetched profile; `None` when signed out or the token was rejected.
    pub async fn customer(&self) -> Option<Customer> {
        self.cached.read().await.clone()
    }
}

#[async_trait]
impl Revalidate for CustomerRevalidator {
    #[instrument(skip(self))]
    async fn revalidate(&self) -> Result<(), CommerceError> {
        let Some(token) = self.session.token().await else {
            debug!("no customer session, clearing cached profile");
            *self.cached.write().await = None;
            return Ok(());
        };

        let request = GraphqlRequest::new(GET_CUSTOMER, json!({ "customerAccessToken": token }));
        let data: CustomerQueryData = decode(self.fetch.fetch(request).await?)?;
        debug!(found = data.customer.is_some(), "customer profile refreshed");
        *self.cached.write().await = data.customer;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingFetch;
    use crate::session::MemorySessionStore;
    use common::FetchError;

    #[tokio::test]
    async fn without_session_nothing_is_fetched() {
        let fetch = Arc::new(RecordingFetch::default());
        let revalidator = CustomerRevalidator::new(fetch.clone(), Arc::new(MemorySessionStore::new()));

        revalidator.revalidate().await.unwrap();

        assert!(fetch.requests().is_empty());
        assert_eq!(revalidator.customer().await, None);
    }

    #[tokio::test]
    async fn caches_profile_for_current_token() {
        let fetch = Arc::new(RecordingFetch::with_responses(vec![Ok(json!({
            "customer": {
                "id": "gid://shopify/Customer/1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "displayName": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": null,
                "acceptsMarketing": true
            }
        }))]));
        let session = Arc::new(MemorySessionStore::new());
        session.set_token("tok123", None).await.unwrap();
        let revalidator = CustomerRevalidator::new(fetch.clone(), session);

        revalidator.revalidate().await.unwrap();

        let customer = revalidator.customer().await.unwrap();
        assert_eq!(customer.email.as_deref(), Some("ada@example.com"));
        assert!(customer.accepts_marketing);
        assert_eq!(fetch.requests()[0].variables, json!({ "customerAccessToken": "tok123" }));
    }

    #[tokio::test]
    async fn rejected_token_clears_cache() {
        let fetch = Arc::new(RecordingFetch::with_responses(vec![Ok(json!({ "customer": null }))]));
        let session = Arc::new(MemorySessionStore::new());
        session.set_token("stale", None).await.unwrap();
        let revalidator = CustomerRevalidator::new(fetch, session);

        revalidator.revalidate().await.unwrap();
        assert_eq!(revalidator.customer().await, None);
    }

    #[tokio::test]
    async fn transport_errors_surface() {
        let fetch = Arc::new(RecordingFetch::with_responses(vec![Err(FetchError::Status {
            status: 502,
            body: "bad gateway".into(),
        })]));
        let session = Arc::new(MemorySessionStore::new());
        session.set_token("tok", None).await.unwrap();
        let revalidator = CustomerRevalidator::new(fetch, session);

        let err = revalidator.revalidate().await.unwrap_err();
        assert_eq!(err.code(), 1100);
    }
}
