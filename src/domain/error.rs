//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// A field value or field combination the user must correct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid value '{value}' for {field}: allowed values are {}", .allowed.join(", "))]
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} is out of range (got {value}, max {max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("invalid time span '{value}' for {field}: expected [d.]hh:mm[:ss] between 00:00:00 and 1.00:00:00")]
    InvalidTimeSpan { field: &'static str, value: String },

    #[error("replication provider '{provider}' is not valid for the {parameter_set} parameter set")]
    IncorrectReplicationProvider {
        provider: String,
        parameter_set: &'static str,
    },
}

/// The bound fields do not identify exactly one parameter set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("ambiguous parameter set: bound fields match {}", .candidates.join(", "))]
    AmbiguousParameterSet { candidates: Vec<&'static str> },

    #[error("no matching parameter set for fields: {}", .bound.join(", "))]
    NoMatchingParameterSet { bound: Vec<String> },

    #[error("parameter set {parameter_set} requires: {}", .missing.join(", "))]
    MissingRequired {
        parameter_set: &'static str,
        missing: Vec<&'static str>,
    },

    #[error("unknown parameter set '{0}'")]
    UnknownParameterSet(String),
}

/// Domain errors represent invalid input caught before any remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
