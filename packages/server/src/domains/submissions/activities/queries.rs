//! Submission query actions

use super::{load, parse_submission_id};
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::{Submission, SubmissionFilter};
use crate::kernel::ServerDeps;

/// Get a single submission by id
pub async fn get_submission(
    submission_id: String,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    let id = parse_submission_id(&submission_id)?;
    load(id, deps).await
}

/// List submissions, newest first
pub async fn get_submissions(
    filter: SubmissionFilter,
    deps: &ServerDeps,
) -> Result<Vec<Submission>, SubmissionError> {
    deps.submissions
        .list(&filter)
        .await
        .map_err(SubmissionError::Internal)
}
