//! Error types. Most of the crate passes `anyhow::Error` around; the remote API boundary produces
//! the typed `ApiError` so that flows can tell an expired session apart from everything else.

use reqwest::StatusCode;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The message the budgeting service sends when the session token is no longer valid.
pub const SESSION_EXPIRED_MESSAGE: &str = "Сесія закінчилася. Будь ласка, увійдіть знову.";

/// Errors produced at the boundary with the remote transaction API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("The session has expired, please log in again")]
    SessionExpired,

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub(crate) fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape(message.into())
    }

    /// Builds the error for a non-success HTTP response. A 401, or any body whose message is the
    /// service's session-expired text, becomes `SessionExpired`.
    pub(crate) fn from_status(status: StatusCode, message: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED
            || message.as_deref() == Some(SESSION_EXPIRED_MESSAGE)
        {
            return Self::SessionExpired;
        }
        Self::Status {
            status,
            message: message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            }),
        }
    }
}

/// The two ways a flow reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Redirect to login and swallow the error.
    SessionExpired,
    /// Log for diagnostics.
    Other,
}

impl ErrorKind {
    /// Classifies an error by looking for an `ApiError::SessionExpired` anywhere in its chain.
    pub fn of(e: &Error) -> Self {
        let expired = e.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<ApiError>(),
                Some(ApiError::SessionExpired)
            )
        });
        if expired {
            ErrorKind::SessionExpired
        } else {
            ErrorKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_unauthorized_is_session_expired() {
        let e = ApiError::from_status(StatusCode::UNAUTHORIZED, None);
        assert!(matches!(e, ApiError::SessionExpired));
    }

    #[test]
    fn test_session_message_is_session_expired() {
        let e = ApiError::from_status(
            StatusCode::FORBIDDEN,
            Some(SESSION_EXPIRED_MESSAGE.to_string()),
        );
        assert!(matches!(e, ApiError::SessionExpired));
    }

    #[test]
    fn test_other_status_keeps_message() {
        let e = ApiError::from_status(StatusCode::BAD_REQUEST, Some("bad amount".to_string()));
        assert_eq!(
            e.to_string(),
            "Request failed with status 400 Bad Request: bad amount"
        );
    }

    #[test]
    fn test_status_without_message_uses_reason() {
        let e = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert!(e.to_string().ends_with("Internal Server Error"));
    }

    #[test]
    fn test_kind_through_context() {
        let e: Error = Err::<(), _>(ApiError::SessionExpired)
            .context("Failed to load monthly transactions")
            .unwrap_err();
        assert_eq!(ErrorKind::of(&e), ErrorKind::SessionExpired);
    }

    #[test]
    fn test_kind_other() {
        let e: Error = ApiError::unexpected_shape("not a list").into();
        assert_eq!(ErrorKind::of(&e), ErrorKind::Other);
        let e = anyhow::anyhow!("something else");
        assert_eq!(ErrorKind::of(&e), ErrorKind::Other);
    }
}
