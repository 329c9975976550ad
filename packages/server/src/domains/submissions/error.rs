use thiserror::Error;

use crate::common::{ErrorCode, FieldError, SubmissionId};

/// Failures of the submission lifecycle operations
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Validation failed with {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Submission {0} not found")]
    NotFound(SubmissionId),

    #[error("Invalid submission id: {0}")]
    InvalidId(String),

    #[error("Submission {0} is already approved")]
    AlreadyApproved(SubmissionId),

    #[error("Autofill failed: {0}")]
    AutofillFailure(String),

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Failed before anything was written
    #[error("Internal error: {0}")]
    Internal(#[source] anyhow::Error),

    /// Failed after a write; the operation's own effects were compensated
    #[error("{operation} failed and was rolled back: {source}")]
    RolledBack {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl SubmissionError {
    /// The `{field, errorCode, httpStatus}` list reported to callers. Never empty.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            SubmissionError::Validation(errors) => errors.clone(),
            SubmissionError::NotFound(_) => vec![FieldError::new("id", ErrorCode::NotFound)],
            SubmissionError::InvalidId(_) => vec![FieldError::new("id", ErrorCode::InvalidId)],
            SubmissionError::AlreadyApproved(_) => vec![FieldError::new(
                "isApproved",
                ErrorCode::SubmissionAlreadyApproved,
            )],
            SubmissionError::AutofillFailure(_) => vec![FieldError::new(
                "autofillPlaceFromSubmissionUrl",
                ErrorCode::AutofillFailure,
            )],
            SubmissionError::InvalidInput { field, .. } => {
                vec![FieldError::new(*field, ErrorCode::InvalidInput)]
            }
            SubmissionError::Internal(_) => vec![FieldError::new(
                "submission",
                ErrorCode::InternalServerError,
            )],
            SubmissionError::RolledBack { .. } => {
                vec![FieldError::new("submission", ErrorCode::ServerError)]
            }
        }
    }

    /// Status of the first reported error
    pub fn http_status(&self) -> u16 {
        self.field_errors()
            .first()
            .map(|e| e.http_status)
            .unwrap_or(500)
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.field_errors().first().map(|e| e.error_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_is_a_404() {
        let error = SubmissionError::NotFound(SubmissionId::new());
        assert_eq!(error.http_status(), 404);
        assert_eq!(error.error_code(), Some(ErrorCode::NotFound));
    }

    #[test]
    fn rolled_back_surfaces_as_server_error() {
        let error = SubmissionError::RolledBack {
            operation: "updateSubmission",
            source: anyhow::anyhow!("audit log unavailable"),
        };
        assert_eq!(error.error_code(), Some(ErrorCode::ServerError));
        assert_eq!(error.http_status(), 500);
        assert!(error.to_string().contains("audit log unavailable"));
    }

    #[test]
    fn validation_keeps_every_field_error() {
        let error = SubmissionError::Validation(vec![
            FieldError::new("googleMapsUrl", ErrorCode::Required),
            FieldError::new("notes", ErrorCode::InvalidLengthTooLong),
        ]);
        assert_eq!(error.field_errors().len(), 2);
        assert_eq!(error.http_status(), 400);
    }
}
