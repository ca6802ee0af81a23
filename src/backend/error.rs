use std::fmt;

use super::types::ErrorBody;

/// Failure talking to the leaderboard API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Bad input the user can fix (400, 409 and other 4xx)
    Validation { status: u16, message: String },
    /// Missing or rejected session (401/403); prompt to sign in again
    Auth { status: u16, message: String },
    NotFound(String),
    /// Transport failure or a body that was not the JSON we expected
    Network(String),
    /// 5xx
    Server { status: u16, message: String },
}

impl BackendError {
    /// Classify a non-2xx response using the server's `{error}` body when
    /// present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = match (parsed.error, parsed.details) {
            (Some(error), Some(details)) => format!("{}: {}", error, details),
            (Some(error), None) => error,
            (None, _) => default_message(status).to_string(),
        };

        match status {
            401 | 403 => BackendError::Auth { status, message },
            404 => BackendError::NotFound(message),
            400..=499 => BackendError::Validation { status, message },
            _ => BackendError::Server { status, message },
        }
    }

    /// Whether the user should be asked to sign in again
    pub fn needs_login(&self) -> bool {
        matches!(self, BackendError::Auth { .. })
    }

    /// Short text suitable for the status line
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Validation { message, .. } => message.clone(),
            BackendError::Auth { .. } => "Please sign in again".to_string(),
            BackendError::NotFound(message) => message.clone(),
            BackendError::Network(_) => "Network error".to_string(),
            BackendError::Server { .. } => "Server error, try again later".to_string(),
        }
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request",
        401 => "Authentication required",
        403 => "Access denied",
        404 => "Not found",
        409 => "Already exists",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Validation { status, message } => {
                write!(f, "invalid request ({}): {}", status, message)
            }
            BackendError::Auth { status, message } => {
                write!(f, "not authorized ({}): {}", status, message)
            }
            BackendError::NotFound(message) => write!(f, "not found: {}", message),
            BackendError::Network(message) => write!(f, "network error: {}", message),
            BackendError::Server { status, message } => {
                write!(f, "server error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(matches!(
            BackendError::from_status(400, "{}"),
            BackendError::Validation { status: 400, .. }
        ));
        assert!(matches!(
            BackendError::from_status(409, r#"{"error":"Username already exists"}"#),
            BackendError::Validation { status: 409, .. }
        ));
        assert!(BackendError::from_status(401, "").needs_login());
        assert!(BackendError::from_status(403, "").needs_login());
        assert!(matches!(
            BackendError::from_status(404, ""),
            BackendError::NotFound(_)
        ));
        assert!(matches!(
            BackendError::from_status(503, "<html>"),
            BackendError::Server { status: 503, .. }
        ));
    }

    #[test]
    fn test_server_message_is_kept() {
        let err = BackendError::from_status(
            400,
            r#"{"error":"Invalid score data","details":"score must be a number"}"#,
        );
        assert_eq!(err.user_message(), "Invalid score data: score must be a number");
    }

    #[test]
    fn test_missing_body_gets_default_message() {
        let err = BackendError::from_status(409, "");
        assert_eq!(err.user_message(), "Already exists");
    }
}
