use common::FetchError;
use thiserror::Error;

/// Errors surfaced by storefront customer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommerceError {
    /// Local precondition failed before any request was sent.
    #[error("{0}")]
    InvalidInput(&'static str),
    /// The storefront rejected the input with a customer user error.
    #[error("{0}")]
    Validation(String),
    /// Transport failure, passed through untouched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("session store error: {0}")]
    Session(String),
}

impl CommerceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CommerceError::InvalidInput(_) => 1001,
            CommerceError::Validation(_) => 1002,
            CommerceError::Fetch(_) => 1100,
            CommerceError::Session(_) => 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_keep_their_message() {
        let inner = FetchError::Network("connection refused".into());
        let err = CommerceError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.code(), 1100);
    }
}
