//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slipway
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlipwayError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slipway operations
pub type Result<T> = std::result::Result<T, SlipwayError>;

/// Provider error codes reported by the remote document store.
///
/// `FailedPrecondition` doubles as the missing-composite-index signature on
/// ordered queries, which the store adapters degrade around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteErrorCode {
    FailedPrecondition,
    Unavailable,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    PermissionDenied,
    Internal,
}

/// Error returned by remote document store operations.
#[derive(Debug, Clone, Error)]
#[error("Remote store error ({code:?}): {message}")]
pub struct RemoteError {
    /// Provider-specific code.
    pub code: RemoteErrorCode,
    /// Human-readable detail from the provider.
    pub message: String,
}

impl RemoteError {
    /// Build an error with the given code and message.
    pub fn new(code: RemoteErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Transport-level failure (DNS, refused connection, timed-out request).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorCode::Unavailable, message)
    }

    /// Whether callers must treat this as a connectivity failure (fallback to
    /// the local cache) rather than a data error.
    pub fn is_connectivity(&self) -> bool {
        matches!(self.code, RemoteErrorCode::FailedPrecondition | RemoteErrorCode::Unavailable)
    }
}

impl From<RemoteError> for SlipwayError {
    fn from(err: RemoteError) -> Self {
        match err.code {
            RemoteErrorCode::Unavailable => Self::Network(err.message),
            RemoteErrorCode::NotFound => Self::NotFound(err.message),
            RemoteErrorCode::InvalidArgument | RemoteErrorCode::AlreadyExists => {
                Self::InvalidInput(err.message)
            }
            RemoteErrorCode::PermissionDenied => Self::Auth(err.message),
            RemoteErrorCode::FailedPrecondition | RemoteErrorCode::Internal => {
                Self::Internal(err.message)
            }
        }
    }
}

/// Failure kinds reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityErrorKind {
    EmailInUse,
    InvalidCredentials,
    WeakPassword,
    UserNotFound,
    Network,
    Internal,
}

/// Error returned by identity provider operations.
#[derive(Debug, Clone, Error)]
#[error("Identity error ({kind:?}): {message}")]
pub struct IdentityError {
    /// Failure classification.
    pub kind: IdentityErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl IdentityError {
    /// Build an error with the given kind and message.
    pub fn new(kind: IdentityErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Whether the failure is connectivity rather than a credential problem.
    pub fn is_connectivity(&self) -> bool {
        self.kind == IdentityErrorKind::Network
    }
}

impl From<IdentityError> for SlipwayError {
    fn from(err: IdentityError) -> Self {
        match err.kind {
            IdentityErrorKind::Network => Self::Network(err.message),
            IdentityErrorKind::UserNotFound => Self::NotFound(err.message),
            IdentityErrorKind::Internal => Self::Internal(err.message),
            IdentityErrorKind::EmailInUse
            | IdentityErrorKind::InvalidCredentials
            | IdentityErrorKind::WeakPassword => Self::Auth(err.message),
        }
    }
}
