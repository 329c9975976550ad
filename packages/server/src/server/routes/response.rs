use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::common::FieldError;
use crate::domains::submissions::SubmissionError;

/// `{data, errors}` envelope returned by every submission route.
///
/// The HTTP status is that of the first error, or 200 without errors.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub errors: Vec<FieldError>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<FieldError>) -> Self {
        Self { data: None, errors }
    }

    pub fn status(&self) -> StatusCode {
        self.errors
            .first()
            .and_then(|e| StatusCode::from_u16(e.http_status).ok())
            .unwrap_or(StatusCode::OK)
    }
}

impl<T, U> From<Result<U, SubmissionError>> for ApiResponse<T>
where
    U: Into<T>,
{
    fn from(result: Result<U, SubmissionError>) -> Self {
        match result {
            Ok(value) => Self::success(value.into()),
            Err(e) => Self::failure(e.field_errors()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
