//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) => exitcode::USAGE,
                    ApplicationError::BuiltinEnvironment(_) => exitcode::USAGE,
                    ApplicationError::Remote(_) => exitcode::UNAVAILABLE,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::EnvironmentNotFound(_) => exitcode::NOINPUT,
                    ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::RemoteError;
    use crate::domain::{ConfigurationError, DomainError, ValidationError};
    use rstest::rstest;

    #[rstest]
    #[case(
        ApplicationError::Domain(DomainError::Validation(ValidationError::Empty { field: "name" })),
        exitcode::USAGE
    )]
    #[case(
        ApplicationError::Domain(DomainError::Configuration(ConfigurationError::NoMatchingParameterSet { bound: vec![] })),
        exitcode::USAGE
    )]
    #[case(ApplicationError::Remote(RemoteError::NotConfigured("vault_name")), exitcode::UNAVAILABLE)]
    #[case(ApplicationError::Config { message: "bad".into() }, exitcode::CONFIG)]
    #[case(ApplicationError::EnvironmentNotFound("x".into()), exitcode::NOINPUT)]
    fn given_application_error_when_mapping_then_sysexits_code(
        #[case] error: ApplicationError,
        #[case] expected: i32,
    ) {
        assert_eq!(CliError::from(error).exit_code(), expected);
    }

    #[test]
    fn given_usage_error_when_mapping_then_usage_code() {
        let err = CliError::Usage("command does not use services".into());
        assert_eq!(err.exit_code(), exitcode::USAGE);
    }

    #[test]
    fn given_io_error_when_mapping_then_ioerr() {
        let err = CliError::from(InfraError::io(
            "write",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        ));
        assert_eq!(err.exit_code(), exitcode::IOERR);
    }
}
