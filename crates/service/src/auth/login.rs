use std::sync::Arc;

use async_trait::async_trait;
use common::graphql::{decode, StorefrontFetch};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::domain::{Credentials, CustomerAccessTokenCreateInput, CustomerErrorCode, CustomerUserError, LoginMutationData};
use super::mutations::CUSTOMER_ACCESS_TOKEN_CREATE;
use crate::errors::CommerceError;
use crate::hook::{FetchOptions, FetcherContext, MutationHook, Revalidate};
use crate::session::SessionStore;

pub const MISSING_CREDENTIALS: &str = "An email and password are required to login";
pub const UNIDENTIFIED_CUSTOMER_MESSAGE: &str = "Cannot find an account that matches the provided credentials";

/// User-facing message for a customer user error.
pub fn error_message(error: &CustomerUserError) -> String {
    match error.code {
        Some(CustomerErrorCode::UnidentifiedCustomer) => UNIDENTIFIED_CUSTOMER_MESSAGE.to_string(),
        _ => error.message.clone(),
    }
}

/// Customer login: exchanges credentials for an access token and hands it to the session store.
pub struct LoginHandler {
    options: FetchOptions,
    session: Arc<dyn SessionStore>,
}

impl LoginHandler {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { options: FetchOptions { query: CUSTOMER_ACCESS_TOKEN_CREATE }, session }
    }

    /// Bind this handler to a transport and a revalidation capability.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{Credentials, LoginHandler};
    /// use service::mock::{RecordingFetch, RecordingRevalidator};
    /// use service::session::{MemorySessionStore, SessionStore};
    ///
    /// let fetch = Arc::new(RecordingFetch::with_responses(vec![Ok(serde_json::json!({
    ///     "customerAccessTokenCreate": {
    ///         "customerUserErrors": [],
    ///         "customerAccessToken": { "accessToken": "tok123" }
    ///     }
    /// }))]));
    /// let session = Arc::new(MemorySessionStore::new());
    /// let revalidate = Arc::new(RecordingRevalidator::default());
    /// let login = LoginHandler::new(session.clone()).use_hook(fetch, revalidate.clone());
    ///
    /// tokio_test::block_on(login.login(Credentials::new("u@e.com", "Passw0rd"))).unwrap();
    /// assert_eq!(tokio_test::block_on(session.token()).as_deref(), Some("tok123"));
    /// assert_eq!(revalidate.calls(), 1);
    /// ```
    pub fn use_hook(self, fetch: Arc<dyn StorefrontFetch>, revalidate: Arc<dyn Revalidate>) -> LoginHook {
        LoginHook { handler: Arc::new(self), fetch, revalidate }
    }
}

#[async_trait]
impl MutationHook for LoginHandler {
    type Input = Credentials;
    type Output = ();

    fn fetch_options(&self) -> &FetchOptions {
        &self.options
    }

    #[instrument(skip(self, ctx), fields(email = %ctx.input.email))]
    async fn fetcher(&self, ctx: FetcherContext<'_, Credentials>) -> Result<(), CommerceError> {
        let FetcherContext { input, options, fetch } = ctx;
        if !input.is_complete() {
            return Err(CommerceError::InvalidInput(MISSING_CREDENTIALS));
        }

        let variables = json!({
            "input": CustomerAccessTokenCreateInput { email: &input.email, password: &input.password },
        });
        let data: LoginMutationData = decode(fetch.fetch(options.request(variables)).await?)?;

        if let Some(first) = data.user_errors().first() {
            debug!(code = ?first.code, "customer user error");
            return Err(CommerceError::Validation(error_message(first)));
        }

        // persistence is a side effect; the storefront already accepted the login
        if let Some((token, expires_at)) = data.access_token() {
            match self.session.set_token(token, expires_at).await {
                Ok(()) => info!("customer access token stored"),
                Err(e) => warn!(error = %e, "failed to persist customer access token"),
            }
        } else {
            debug!("login response carried no access token");
        }

        Ok(())
    }
}

/// Ready-to-call login, bound to its collaborators.
#[derive(Clone)]
pub struct LoginHook {
    handler: Arc<LoginHandler>,
    fetch: Arc<dyn StorefrontFetch>,
    revalidate: Arc<dyn Revalidate>,
}

impl LoginHook {
    /// Log in, then refresh customer data so callers observe the new session.
    /// Revalidation is skipped when the login itself fails.
    pub async fn login(&self, input: Credentials) -> Result<(), CommerceError> {
        let ctx = FetcherContext {
            input,
            options: self.handler.fetch_options(),
            fetch: self.fetch.as_ref(),
        };
        self.handler.fetcher(ctx).await?;
        self.revalidate.revalidate().await?;
        Ok(())
    }
}
