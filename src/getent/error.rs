use thiserror::Error;

#[derive(Error, Debug)]
pub enum GetentError {
    #[error("Failed to find required 'getent' binary in path: {0}")]
    ExecutableNotFound(#[from] which::Error),

    #[error("Failed to execute getent: {0}")]
    ExecutionError(#[source] std::io::Error),

    #[error("Missing arguments, or database unknown.")]
    DatabaseArgumentError,

    #[error("One or more supplied key could not be found in the database.")]
    KeyNotFound,

    #[error("Enumeration not supported on this database.")]
    EnumerationUnsupported,

    #[error("Unexpected failure!")]
    UnexpectedExitCode(Option<i32>),
}

impl GetentError {
    /// Map a non-zero getent exit status to its error.
    ///
    /// `None` means the process was terminated by a signal.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(1) => GetentError::DatabaseArgumentError,
            Some(2) => GetentError::KeyNotFound,
            Some(3) => GetentError::EnumerationUnsupported,
            other => GetentError::UnexpectedExitCode(other),
        }
    }

    /// Stable identifier used as the event code in structured output.
    pub fn code(&self) -> &'static str {
        match self {
            GetentError::ExecutableNotFound(_) => "getent.executable_not_found",
            GetentError::ExecutionError(_) => "getent.execution_error",
            GetentError::DatabaseArgumentError => "getent.database_argument_error",
            GetentError::KeyNotFound => "getent.key_not_found",
            GetentError::EnumerationUnsupported => "getent.enumeration_unsupported",
            GetentError::UnexpectedExitCode(_) => "getent.unexpected_exit_code",
        }
    }

    /// Diagnostic detail for failures caused by the process itself rather than getent's answer.
    pub fn exception(&self) -> Option<String> {
        match self {
            GetentError::ExecutionError(e) => Some(format!("{e:?}")),
            GetentError::ExecutableNotFound(e) => Some(format!("{e:?}")),
            GetentError::UnexpectedExitCode(None) => {
                Some("getent was terminated by a signal".to_string())
            }
            _ => None,
        }
    }
}
