//! Field-level error records shared by validation and the lifecycle engine.
//!
//! Every public lifecycle operation reports failures as a list of
//! `{field, errorCode, httpStatus}` entries.

use serde::{Deserialize, Serialize};

/// Machine-readable error codes surfaced to API callers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Lookup
    NotFound,
    InvalidId,

    // Validation
    Required,
    MissingInput,
    InvalidLengthTooLong,
    InvalidLengthTooShort,
    ContainsInvalidCharacter,
    InvalidUrl,

    // State machine
    SubmissionAlreadyApproved,
    AutofillFailure,
    InvalidInput,

    // Infrastructure
    InternalServerError,
    ServerError,
}

impl ErrorCode {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::NotFound | ErrorCode::InvalidId => 404,
            ErrorCode::Required
            | ErrorCode::MissingInput
            | ErrorCode::InvalidLengthTooLong
            | ErrorCode::InvalidLengthTooShort
            | ErrorCode::ContainsInvalidCharacter
            | ErrorCode::InvalidUrl
            | ErrorCode::SubmissionAlreadyApproved
            | ErrorCode::AutofillFailure
            | ErrorCode::InvalidInput => 400,
            ErrorCode::InternalServerError | ErrorCode::ServerError => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidId => "INVALID_ID",
            ErrorCode::Required => "REQUIRED",
            ErrorCode::MissingInput => "MISSING_INPUT",
            ErrorCode::InvalidLengthTooLong => "INVALID_LENGTH_TOO_LONG",
            ErrorCode::InvalidLengthTooShort => "INVALID_LENGTH_TOO_SHORT",
            ErrorCode::ContainsInvalidCharacter => "CONTAINS_INVALID_CHARACTER",
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::SubmissionAlreadyApproved => "SUBMISSION_ALREADY_APPROVED",
            ErrorCode::AutofillFailure => "AUTOFILL_FAILURE",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::ServerError => "SERVER_ERROR",
        };
        f.write_str(code)
    }
}

/// One `{field, errorCode, httpStatus}` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub error_code: ErrorCode,
    pub http_status: u16,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error_code: ErrorCode) -> Self {
        Self {
            field: field.into(),
            error_code,
            http_status: error_code.http_status(),
        }
    }

    /// True for errors about the entity id itself.
    pub fn is_id_error(&self) -> bool {
        self.field == "id"
    }
}
