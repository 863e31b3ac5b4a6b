//! CLI error type and user-facing failure reporting.

use thiserror::Error;

use techstore_api::error::ApiError;
use techstore_api::config::ConfigError;
use techstore_core::CoreError;
use techstore_export::ExportError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Input(String),
}

impl From<inquire::InquireError> for CliError {
    fn from(err: inquire::InquireError) -> Self {
        CliError::Input(err.to_string())
    }
}

/// Maps the error taxonomy onto user-facing messages.
///
/// Auth failures instruct a re-login (credentials are already cleared);
/// transient failures suggest a retry; validation failures point at the
/// offending field.
pub fn report_failure(err: &CliError) {
    match err {
        CliError::Api(ApiError::SessionExpired) => {
            eprintln!("Your session has expired. Run `backoffice login` to sign in again.");
        }
        CliError::Api(ApiError::NotAuthenticated) => {
            eprintln!("Not logged in. Run `backoffice login` first.");
        }
        CliError::Api(ApiError::Core(CoreError::Validation(v))) => {
            eprintln!("Invalid input: {}", v);
        }
        CliError::Api(ApiError::Core(core)) => {
            eprintln!("Rejected: {}", core);
        }
        CliError::Api(ApiError::Transport(msg)) => {
            eprintln!("Could not reach the server: {}", msg);
            eprintln!("Check the connection (or TECHSTORE_API_URL) and retry.");
        }
        CliError::Api(ApiError::Http { message, status, .. }) => match status {
            Some(status) => eprintln!("Server rejected the request ({}): {}", status, message),
            None => eprintln!("Server rejected the request: {}", message),
        },
        other => eprintln!("Error: {}", other),
    }
}
