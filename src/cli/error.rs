//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::DocumentNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::UnknownTemplate(_) => crate::exitcode::USAGE,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::Domain(DomainError::NodeNotFound(_)) => {
                        crate::exitcode::NOINPUT
                    }
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_errors_when_mapping_exit_codes_then_follow_sysexits() {
        let not_found: CliError = ApplicationError::Domain(DomainError::NodeNotFound("x".into())).into();
        assert_eq!(not_found.exit_code(), crate::exitcode::NOINPUT);

        let invalid: CliError = ApplicationError::Domain(DomainError::InvalidMove {
            active: "a".into(),
            target: "b".into(),
        })
        .into();
        assert_eq!(invalid.exit_code(), crate::exitcode::DATAERR);

        assert_eq!(CliError::Usage("x".into()).exit_code(), crate::exitcode::USAGE);
    }
}
