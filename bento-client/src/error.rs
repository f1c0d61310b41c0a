//! Error types for the API client.

use crate::route::Route;
use bento_core::ValidationError;
use bento_storage::StorageError;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
pub const SERVER_ERROR_MESSAGE: &str = "Internal server error";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Everything a client call can fail with.
///
/// Cloneable because one in-flight response is handed to every caller that
/// joined it; wrapped sources are therefore kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The backend answered 401. The session has already been wiped.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("{}", SERVER_ERROR_MESSAGE)]
    Server,

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("No project selected")]
    NoProject,

    #[error("Config error: {0}")]
    Config(String),
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl ClientError {
    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".to_string(),
            Self::Forbidden { message } | Self::Status { message, .. } => message.clone(),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            Self::Server => SERVER_ERROR_MESSAGE.to_string(),
            Self::NotAuthenticated => "Please log in first.".to_string(),
            Self::NoProject => "Please select a project first.".to_string(),
            other => other.to_string(),
        }
    }

    /// Where the UI should go after this error, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Unauthorized { .. } | Self::NotAuthenticated => Some(Route::Login),
            Self::NoProject => Some(Route::ProjectSetup),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let err = ClientError::Unauthorized {
            message: "token expired".to_string(),
        };
        assert_eq!(err.redirect(), Some(Route::Login));
        assert_eq!(ClientError::Server.redirect(), None);
    }

    #[test]
    fn test_fixed_login_messages() {
        assert_eq!(
            ClientError::InvalidCredentials.user_message(),
            "Invalid email or password"
        );
        assert_eq!(ClientError::Server.to_string(), "Internal server error");
        assert_eq!(
            ClientError::Network("connection refused".into()).user_message(),
            "Network error occurred"
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let err: ClientError = StorageError::LockPoisoned.into();
        assert!(matches!(err, ClientError::Storage(_)));
    }
}
