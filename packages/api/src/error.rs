use resolver::ValidationError;

/// Everything that can go wrong talking to the API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    /// A 401 with no refresh token to recover with.
    #[error("not authenticated")]
    Unauthorized,
    /// The refresh failed, or the retried request was rejected again. The local
    /// session has been cleared.
    #[error("session expired")]
    SessionExpired,
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Text for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Validation(e) => e.to_string(),
            ApiError::Timeout => "The server took too long to respond".to_string(),
            ApiError::Unauthorized | ApiError::SessionExpired => {
                "Your session has expired, please sign in again".to_string()
            }
            _ => "An error occurred".to_string(),
        }
    }

    /// Whether this error means the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let e = ApiError::Status {
            status: 400,
            message: Some("Title already used".into()),
        };
        assert_eq!(e.user_message(), "Title already used");
        assert_eq!(e.to_string(), "server returned 400: Title already used");

        let e = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(e.user_message(), "An error occurred");
    }

    #[test]
    fn test_validation_errors_pass_through() {
        let e = ApiError::from(ValidationError::MissingTitle);
        assert_eq!(e.user_message(), "Title is required");
        assert!(!e.requires_login());
        assert!(ApiError::SessionExpired.requires_login());
    }
}
