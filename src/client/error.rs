use reqwest::StatusCode;

/// Everything an adapter call can fail with. Adapter methods return this
/// instead of panicking; deciding how to surface it is the caller's job.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS...).
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error: {status}{}", detail(.message))]
    Http {
        status: StatusCode,
        message: Option<String>,
    },

    /// A response body or the stored token could not be decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("{operation} is not supported for {resource}")]
    Unsupported {
        operation: &'static str,
        resource: &'static str,
    },
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403 from the server.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_includes_status_and_message() {
        let err = ApiError::Http {
            status: StatusCode::FORBIDDEN,
            message: Some("Invalid or expired token".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "API error: 403 Forbidden: Invalid or expired token"
        );
        assert!(err.is_auth_error());

        let bare = ApiError::Http {
            status: StatusCode::NOT_FOUND,
            message: None,
        };
        assert_eq!(bare.to_string(), "API error: 404 Not Found");
        assert!(!bare.is_auth_error());
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let err = ApiError::Decode("bad".to_string());
        assert!(err.status().is_none());
        assert!(!err.is_auth_error());
    }
}
