//! Error types for the CLI.

use bento_client::{ClientError, ConfigError, Route};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
    #[error("Failed to initialise logging: {0}")]
    Telemetry(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Follow-up advice printed under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Client(err) => match err.redirect() {
                Some(Route::Login) => Some("Run `bento login` to sign in."),
                Some(Route::ProjectSetup) => {
                    Some("Run `bento projects use <id>` or `bento project create`.")
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidArgument(_) => 2,
            CliError::Client(ClientError::Unauthorized { .. } | ClientError::NotAuthenticated) => 3,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
