//! CLI error types and exit codes.

use thiserror::Error;

use ldsync_core::ReconcileError;
use ldsync_ldap::DirectoryError;

/// Exit codes:
/// - 0: success
/// - 1: internal fault
/// - 2: configuration error
/// - 3: connection or authentication failure
/// - 4: search failure
/// - 5: store-side apply failure
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Apply failed: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Connection(_) => 3,
            CliError::Search(_) => 4,
            CliError::Store(_) => 5,
            CliError::Internal(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting.
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        } else {
            eprintln!("Error: {self}");
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(e: DirectoryError) -> Self {
        match &e {
            DirectoryError::InvalidConfiguration { .. } => CliError::Config(e.to_string()),
            DirectoryError::ConnectionFailed { .. } | DirectoryError::AuthenticationFailed => {
                CliError::Connection(e.to_string())
            }
            DirectoryError::SearchFailed { .. } => CliError::Search(e.to_string()),
            _ => CliError::Store(e.to_string()),
        }
    }
}

impl From<ReconcileError> for CliError {
    fn from(e: ReconcileError) -> Self {
        CliError::Internal(e.to_string())
    }
}
