use std::io;
use thiserror::Error;

/// Errors produced while building, running or decoding a terraform invocation
#[derive(Debug, Error)]
pub enum TfExecError {
    /// The process could not be started (binary missing, permission denied, ...)
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("`{command}` failed with {}: {stderr}", exit_description(.exit_code))]
    ExitStatus {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The output did not have the expected shape
    #[error("failed to parse terraform output: {message}: {output:?}")]
    Parse { message: String, output: String },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String },

    #[error("`{command}` exceeded its deadline")]
    DeadlineExceeded { command: String },

    /// A blob argument and an explicit option would both set the same flag
    #[error(
        "the {flag} option cannot be combined with an in-memory blob for the same flag: {options:?}"
    )]
    ConflictingOption { flag: String, options: Vec<String> },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TfExecError {
    pub(crate) fn parse(message: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            output: output.into(),
        }
    }

    /// True when the call was interrupted by its context rather than failing on its own
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            TfExecError::Cancelled { .. } | TfExecError::DeadlineExceeded { .. }
        )
    }

    /// Exit code of the failed process, when there is one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TfExecError::ExitStatus { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, TfExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_display() {
        let err = TfExecError::ExitStatus {
            command: "terraform destroy".to_string(),
            exit_code: Some(1),
            stderr: "Error: boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`terraform destroy` failed with exit code 1: Error: boom"
        );
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_signal_exit_display() {
        let err = TfExecError::ExitStatus {
            command: "terraform apply".to_string(),
            exit_code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_cancellation_kinds() {
        let cancelled = TfExecError::Cancelled {
            command: "terraform plan".to_string(),
        };
        let expired = TfExecError::DeadlineExceeded {
            command: "terraform plan".to_string(),
        };
        assert!(cancelled.is_cancellation());
        assert!(expired.is_cancellation());
        assert!(!TfExecError::Config("x".to_string()).is_cancellation());
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: TfExecError = io_err.into();
        assert!(matches!(err, TfExecError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_conflicting_option_display() {
        let err = TfExecError::ConflictingOption {
            flag: "-state=".to_string(),
            options: vec!["-state=foo.tfstate".to_string()],
        };
        assert!(err.to_string().contains("-state="));
        assert!(err.to_string().contains("foo.tfstate"));
    }
}
