//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Failure reported by, or while talking to, the remote management service.
///
/// Surfaced to the caller as-is; never retried.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("remote service rejected the request (HTTP {status}): {code}: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected response from remote service: {0}")]
    InvalidResponse(String),

    #[error("site recovery client is not configured: set site_recovery.{0}")]
    NotConfigured(&'static str),
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    #[error("cannot change built-in environment: {0}")]
    BuiltinEnvironment(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
