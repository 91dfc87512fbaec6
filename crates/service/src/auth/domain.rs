use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login input. Absent fields deserialize as empty strings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Both fields present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `variables.input` of the `customerAccessTokenCreate` mutation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerAccessTokenCreateInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Storefront `CustomerErrorCode`. Codes this crate does not know about are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CustomerErrorCode {
    Blank,
    Invalid,
    Taken,
    TooLong,
    TooShort,
    UnidentifiedCustomer,
    CustomerDisabled,
    PasswordStartsOrEndsWithWhitespace,
    TokenInvalid,
    NotFound,
    Other(String),
}

impl CustomerErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            CustomerErrorCode::Blank => "BLANK",
            CustomerErrorCode::Invalid => "INVALID",
            CustomerErrorCode::Taken => "TAKEN",
            CustomerErrorCode::TooLong => "TOO_LONG",
            CustomerErrorCode::TooShort => "TOO_SHORT",
            CustomerErrorCode::UnidentifiedCustomer => "UNIDENTIFIED_CUSTOMER",
            CustomerErrorCode::CustomerDisabled => "CUSTOMER_DISABLED",
            CustomerErrorCode::PasswordStartsOrEndsWithWhitespace => "PASSWORD_STARTS_OR_ENDS_WITH_WHITESPACE",
            CustomerErrorCode::TokenInvalid => "TOKEN_INVALID",
            CustomerErrorCode::NotFound => "NOT_FOUND",
            CustomerErrorCode::Other(code) => code,
        }
    }
}

impl From<String> for CustomerErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "BLANK" => CustomerErrorCode::Blank,
            "INVALID" => CustomerErrorCode::Invalid,
            "TAKEN" => CustomerErrorCode::Taken,
            "TOO_LONG" => CustomerErrorCode::TooLong,
            "TOO_SHORT" => CustomerErrorCode::TooShort,
            "UNIDENTIFIED_CUSTOMER" => CustomerErrorCode::UnidentifiedCustomer,
            "CUSTOMER_DISABLED" => CustomerErrorCode::CustomerDisabled,
            "PASSWORD_STARTS_OR_ENDS_WITH_WHITESPACE" => CustomerErrorCode::PasswordStartsOrEndsWithWhitespace,
            "TOKEN_INVALID" => CustomerErrorCode::TokenInvalid,
            "NOT_FOUND" => CustomerErrorCode::NotFound,
            _ => CustomerErrorCode::Other(code),
        }
    }
}

impl fmt::Display for CustomerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned inside a successful storefront response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerUserError {
    pub code: Option<CustomerErrorCode>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccessToken {
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccessTokenCreatePayload {
    pub customer_user_errors: Option<Vec<CustomerUserError>>,
    pub customer_access_token: Option<CustomerAccessToken>,
}

/// `data` of the `customerAccessTokenCreate` mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginMutationData {
    pub customer_access_token_create: Option<CustomerAccessTokenCreatePayload>,
}

impl LoginMutationData {
    pub fn user_errors(&self) -> &[CustomerUserError] {
        self.customer_access_token_create
            .as_ref()
            .and_then(|p| p.customer_user_errors.as_deref())
            .unwrap_or_default()
    }

    /// Non-empty access token with its remote expiry, if the response carried one.
    pub fn access_token(&self) -> Option<(&str, Option<DateTime<Utc>>)> {
        let token = self.customer_access_token_create.as_ref()?.customer_access_token.as_ref()?;
        token
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| (t, token.expires_at))
    }
}
