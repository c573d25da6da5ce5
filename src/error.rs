use thiserror::Error;

/// Failure of a single backend call.
///
/// Every facade returns one of these instead of a silent `null`, so callers
/// can tell "the request failed" apart from "the backend had no data".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401/403 from the backend. The session has already been invalidated
    /// by the time the caller sees this.
    #[error("Unauthorized ({status}): session is no longer valid")]
    Unauthorized { status: u16 },

    /// 401/403 from an endpoint that takes no token (login, register).
    /// Any existing session is left alone.
    #[error("Invalid credentials ({status})")]
    InvalidCredentials { status: u16 },

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("No signed-in user")]
    NotSignedIn,

    /// Rejected before any request was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for facade results
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Crate-level errors outside a single backend call
#[derive(Debug, Error)]
pub enum PortalError {
    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Missing required configuration: {0}")]
    MissingConfiguration(String),

    /// Session storage errors
    #[error("Session storage error: {0}")]
    SessionStorage(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results using PortalError
pub type Result<T> = std::result::Result<T, PortalError>;

impl PortalError {
    /// Helper to create Internal errors with context
    pub fn internal(msg: impl Into<String>) -> Self {
        PortalError::Internal(msg.into())
    }

    /// Helper to create session storage errors
    pub fn session_storage(msg: impl Into<String>) -> Self {
        PortalError::SessionStorage(msg.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned status 500: boom");

        let err = ApiError::Unauthorized { status: 401 };
        assert!(err.is_unauthorized());

        let err = ApiError::InvalidCredentials { status: 401 };
        assert!(!err.is_unauthorized());
        assert_eq!(err.to_string(), "Invalid credentials (401)");
    }

    #[test]
    fn test_error_helpers() {
        let err = PortalError::internal("Something went wrong");
        assert!(matches!(err, PortalError::Internal(_)));

        let err: PortalError = ApiError::NotSignedIn.into();
        assert!(matches!(err, PortalError::Api(ApiError::NotSignedIn)));
    }
}
