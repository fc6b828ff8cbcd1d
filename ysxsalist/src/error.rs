//! Error types for the AList client

/// Result type alias for AList operations
pub type Result<T> = std::result::Result<T, AlistError>;

/// Errors that can occur when talking to an AList server
#[derive(Debug, thiserror::Error)]
pub enum AlistError {
    /// The server answered with a non-success status, either at the HTTP
    /// level or inside the `{code, message, data}` envelope
    #[error("AList API error on {endpoint} (code {code}): {message}")]
    RemoteApi {
        endpoint: String,
        code: i64,
        message: String,
    },

    /// A success envelope came back without the expected `data` payload
    #[error("AList API returned no data for {0}")]
    MissingData(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl AlistError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a remote API error
    pub fn remote(endpoint: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::RemoteApi {
            endpoint: endpoint.into(),
            code,
            message: message.into(),
        }
    }

    /// Message provided by the server, if this is a remote API error
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::RemoteApi { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials, token or album password
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::RemoteApi { code: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_carries_message() {
        let err = AlistError::remote("/api/fs/list", 500, "object not found");
        assert_eq!(err.remote_message(), Some("object not found"));
        assert!(err.to_string().contains("/api/fs/list"));
        assert!(err.to_string().contains("object not found"));
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_auth_error_codes() {
        assert!(AlistError::remote("/api/fs/list", 403, "password is incorrect").is_auth_error());
        assert!(AlistError::remote("/api/me", 401, "token is expired").is_auth_error());
        assert!(!AlistError::other("boom").is_auth_error());
    }
}
