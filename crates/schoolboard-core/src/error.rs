//! Error types shared by every schoolboard crate.
//!
//! `ApiError` covers everything that can go wrong talking to the backend.
//! `ValidationError` covers the client-side checks that run before a request
//! is built. Defined here so callers can match on them without string
//! inspection, whichever backend produced them.

use thiserror::Error;

/// Fallback shown when the backend gives no usable error message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when interacting with the school-management API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session is stored; the user has to log in first.
    #[error("not logged in, run `schoolboard login` first")]
    NotLoggedIn,

    /// The stored session expired before the request was sent.
    #[error("session expired, log in again")]
    SessionExpired,

    /// The backend rejected the credentials or token (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested record does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned any other non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns `true` if repeating the same request cannot succeed without
    /// the user doing something first (logging in, fixing the id).
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ApiError::NotLoggedIn
                | ApiError::SessionExpired
                | ApiError::Unauthorized(_)
                | ApiError::NotFound(_)
        )
    }

    /// The HTTP status behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A client-side validation failure. The request is never sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("End date must be after start date.")]
    EndNotAfterStart,

    #[error("Start date cannot be in the past.")]
    StartInPast,

    #[error("End date cannot be before start date.")]
    EndBeforeStart,

    #[error("{field} is required.")]
    MissingField { field: String },

    #[error("{field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("cannot move from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}

/// Failure of a form submission: either it never left the client, or the
/// backend refused it.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Validation errors, if the submission failed before any request.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SubmitError::Invalid(errors) => errors,
            SubmitError::Api(_) => &[],
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Invalid(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_form_text() {
        assert_eq!(
            ValidationError::EndNotAfterStart.to_string(),
            "End date must be after start date."
        );
        assert_eq!(
            ValidationError::StartInPast.to_string(),
            "Start date cannot be in the past."
        );
        assert_eq!(
            ValidationError::MissingField {
                field: "Name".into()
            }
            .to_string(),
            "Name is required."
        );
    }

    #[test]
    fn submit_error_joins_all_messages() {
        let err = SubmitError::Invalid(vec![
            ValidationError::MissingField {
                field: "Name".into(),
            },
            ValidationError::MissingField {
                field: "Term".into(),
            },
        ]);
        assert_eq!(err.to_string(), "Name is required. Term is required.");
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn permanence() {
        assert!(ApiError::SessionExpired.is_permanent());
        assert!(ApiError::NotFound("x".into()).is_permanent());
        assert!(!ApiError::Timeout(30).is_permanent());
        assert!(!ApiError::Api {
            status: 500,
            message: "boom".into()
        }
        .is_permanent());
        assert_eq!(ApiError::Unauthorized("no".into()).status(), Some(401));
    }
}
