use std::time::Duration;

use thiserror::Error;

use crate::types::ProductId;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced to callers of the overlay store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("product with id {id} not found")]
    NotFound { id: ProductId },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// The base collection could not be fetched. Recovered at the `list` boundary.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote request failed: {0}")]
    Transport(String),
    #[error("remote request timed out after {0:?}")]
    Timeout(Duration),
    #[error("remote returned status {status}")]
    Status { status: u16 },
    #[error("malformed remote response: {0}")]
    Decode(String),
    #[error("remote source unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{value}': {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported url scheme '{0}', expected http or https")]
    Scheme(String),
    #[error("invalid {name} '{value}': expected milliseconds as an unsigned integer")]
    Timeout { name: &'static str, value: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}
