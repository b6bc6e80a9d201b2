//! Mapping of gateway failures onto the messages shown to operators.

use thiserror::Error;

use crate::model::error::ErrorResponse;

/// A failed call to the gateway REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("The service is temporarily unavailable (HTTP {status}). Please try again later.")]
    Unavailable { status: u16 },
    #[error("Unexpected response from the server (HTTP {status}): {message}")]
    Unexpected { status: u16, message: String },
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("Could not read the server response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-2xx response. `body` is the raw response text; a JSON
    /// [`ErrorResponse`] with a non-blank message replaces the default text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = ErrorResponse::parse(body);
        let message = |fallback: &str| {
            parsed
                .as_ref()
                .and_then(ErrorResponse::message)
                .unwrap_or(fallback)
                .to_string()
        };

        match status {
            400 => ApiError::BadRequest(message("The request contains invalid values.")),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(message("You do not have permission for this operation.")),
            404 => ApiError::NotFound(message("The requested item was not found.")),
            409 => ApiError::Conflict(message(
                "The item was changed by someone else or already exists.",
            )),
            502..=504 => ApiError::Unavailable { status },
            _ => ApiError::Unexpected {
                status,
                message: message("An unexpected error occurred."),
            },
        }
    }

    /// The browser must be sent to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Unavailable { status } | ApiError::Unexpected { status, .. } => {
                Some(*status)
            }
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    /// Text for the toast notification.
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::Network(_) | ApiError::Decode(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Failure of a bulk import phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkError {
    /// The attempt budget ran out before the task reached a terminal state.
    #[error("The {phase} did not finish in time. Please upload the file again.")]
    Timeout { phase: BulkPhase },
    /// The task reached `FAILURE`.
    #[error("The {phase} failed on the server. Please check the file and upload it again.")]
    Failed { phase: BulkPhase },
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPhase {
    Validation,
    Execution,
}

impl std::fmt::Display for BulkPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkPhase::Validation => f.write_str("validation"),
            BulkPhase::Execution => f.write_str("import"),
        }
    }
}

impl BulkError {
    pub fn toast_message(&self) -> String {
        match self {
            BulkError::Api(err) => err.toast_message(),
            other => other.to_string(),
        }
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, BulkError::Api(err) if err.requires_login())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(400, "", ApiError::BadRequest("The request contains invalid values.".to_string()))]
    #[case(401, "", ApiError::Unauthorized)]
    #[case(403, r#"{"code":"","message":""}"#, ApiError::Forbidden("You do not have permission for this operation.".to_string()))]
    #[case(404, r#"{"code":"","message":"group g1 not found."}"#, ApiError::NotFound("group g1 not found.".to_string()))]
    #[case(409, "not json", ApiError::Conflict("The item was changed by someone else or already exists.".to_string()))]
    #[case(502, "", ApiError::Unavailable { status: 502 })]
    #[case(503, "", ApiError::Unavailable { status: 503 })]
    #[case(500, r#"{"code":"","message":"boom"}"#, ApiError::Unexpected { status: 500, message: "boom".to_string() })]
    fn maps_status_codes(#[case] status: u16, #[case] body: &str, #[case] expected: ApiError) {
        let error = ApiError::from_response(status, body);
        assert_eq!(error, expected);
        assert_eq!(error.status(), Some(status));
    }

    #[test]
    fn only_unauthorized_requires_login() {
        assert!(ApiError::from_response(401, "").requires_login());
        assert!(!ApiError::from_response(403, "").requires_login());
        assert!(BulkError::from(ApiError::Unauthorized).requires_login());
        assert!(
            !BulkError::Timeout {
                phase: BulkPhase::Validation
            }
            .requires_login()
        );
    }

    #[test]
    fn timeout_and_failure_have_distinct_messages() {
        let timeout = BulkError::Timeout {
            phase: BulkPhase::Execution,
        };
        let failed = BulkError::Failed {
            phase: BulkPhase::Execution,
        };

        assert_ne!(timeout.toast_message(), failed.toast_message());
        assert!(timeout.toast_message().contains("did not finish in time"));
        assert!(failed.toast_message().contains("failed on the server"));
    }

    #[test]
    fn transport_errors_hide_details_from_toasts() {
        let error = ApiError::Network("TypeError: Failed to fetch".to_string());
        assert!(!error.toast_message().contains("TypeError"));
        assert_eq!(error.status(), None);
    }
}
