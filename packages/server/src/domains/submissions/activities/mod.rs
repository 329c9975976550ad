//! Submission lifecycle activities - business logic functions
//!
//! Every activity is an async function taking the caller's input, the acting
//! user and the injected [`ServerDeps`]. Each one follows the same shape:
//! checks that cannot fail halfway run first, then the first write, then
//! everything after it runs under a [`Compensations`] stack that is unwound if
//! any later step (reload, audit write) fails.

mod approve;
mod autofill;
mod create;
mod delete;
mod healthcare_professional;
mod queries;
mod update;

pub use approve::*;
pub use autofill::*;
pub use create::*;
pub use delete::*;
pub use healthcare_professional::*;
pub use queries::*;
pub use update::*;

use anyhow::Context;
use tracing::error;

use crate::common::SubmissionId;
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::{Submission, SubmissionPatch};
use crate::domains::submissions::validation::validate_id;
use crate::kernel::{Compensations, ServerDeps};

pub(crate) fn parse_submission_id(raw: &str) -> Result<SubmissionId, SubmissionError> {
    validate_id(raw).map_err(|_| SubmissionError::InvalidId(raw.to_string()))
}

/// Read the current row; NOT_FOUND when it is gone.
pub(crate) async fn load(
    id: SubmissionId,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    deps.submissions
        .find_by_id(id)
        .await
        .map_err(SubmissionError::Internal)?
        .ok_or(SubmissionError::NotFound(id))
}

/// Read a row just written by this operation.
pub(crate) async fn reload(id: SubmissionId, deps: &ServerDeps) -> anyhow::Result<Submission> {
    deps.submissions
        .find_by_id(id)
        .await?
        .with_context(|| format!("Submission {} disappeared after write", id))
}

/// Register the undo that writes `pre_image` back over the row.
pub(crate) fn push_restore(
    saga: &mut Compensations<'static>,
    pre_image: &Submission,
    deps: &ServerDeps,
) {
    let store = deps.submissions.clone();
    let pre_image = pre_image.clone();
    saga.push("restore submission pre-image", move || async move {
        store
            .patch(pre_image.id, &SubmissionPatch::restore(&pre_image))
            .await
    });
}

/// Finish an operation whose first write already landed.
///
/// On failure every registered compensation runs and the caller sees
/// SERVER_ERROR; the cause is only logged.
pub(crate) async fn settle<T>(
    saga: Compensations<'_>,
    operation: &'static str,
    outcome: anyhow::Result<T>,
) -> Result<T, SubmissionError> {
    match outcome {
        Ok(value) => Ok(value),
        Err(source) => {
            error!(operation, error = %source, "Step after write failed, compensating");
            let report = saga.compensate().await;
            if !report.is_clean() {
                error!(
                    operation,
                    failed = ?report.failed,
                    "Compensation incomplete, manual repair needed"
                );
            }
            Err(SubmissionError::RolledBack { operation, source })
        }
    }
}
