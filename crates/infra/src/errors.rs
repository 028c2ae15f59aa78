//! Infrastructure error types and conversions into domain errors

use slipway_domain::SlipwayError;
use thiserror::Error;

/// Infrastructure-level failures before translation to domain errors.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for InfraError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        Self::Database(format!("connection pool: {err}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<InfraError> for SlipwayError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Database(msg) => Self::Database(msg),
            InfraError::Serialization(msg) => Self::Internal(msg),
            InfraError::Http(msg) => Self::Network(msg),
            InfraError::Config(msg) => Self::Config(msg),
        }
    }
}
