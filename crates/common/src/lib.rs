use thiserror::Error;

pub mod graphql;
pub mod utils;

/// Transport-level failures raised while talking to the storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("graphql error: {0}")]
    Graphql(String),
}
