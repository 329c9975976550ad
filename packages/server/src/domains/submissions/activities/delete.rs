use tracing::info;

use super::{parse_submission_id, settle};
use crate::common::UserId;
use crate::domains::audit::{AuditAction, AuditObjectType, NewAuditLogEntry};
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::Submission;
use crate::kernel::{Compensations, ServerDeps};

/// Physically remove a submission. Returns the snapshot taken before delete.
///
/// A missing row is reported as INVALID_ID, so deleting twice fails the second
/// time.
pub async fn delete_submission(
    submission_id: String,
    actor: UserId,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    let id = parse_submission_id(&submission_id)?;

    let snapshot = deps
        .submissions
        .find_by_id(id)
        .await
        .map_err(SubmissionError::Internal)?
        .ok_or(SubmissionError::InvalidId(submission_id))?;

    deps.submissions
        .delete(id)
        .await
        .map_err(SubmissionError::Internal)?;

    let mut saga = Compensations::new();
    let store = deps.submissions.clone();
    let restored = snapshot.clone();
    saga.push("re-insert deleted submission", move || async move {
        store.insert_snapshot(&restored).await
    });

    let outcome = async {
        let entry = NewAuditLogEntry::new(
            AuditAction::Delete,
            AuditObjectType::Submission,
            actor,
            Some(&snapshot),
            None,
        )?;
        deps.audit_log.record(entry).await
    }
    .await;

    settle(saga, "deleteSubmission", outcome).await?;

    info!(submission_id = %id, actor_id = %actor, "Submission deleted");
    Ok(snapshot)
}
