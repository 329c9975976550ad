use tracing::info;

use super::settle;
use crate::common::{now_micros, UserId};
use crate::domains::audit::{AuditAction, AuditObjectType, NewAuditLogEntry};
use crate::domains::submissions::data::CreateSubmissionInput;
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::{NewSubmission, Submission, SubmissionStatus};
use crate::domains::submissions::validation::validate_create;
use crate::kernel::{Compensations, ServerDeps};

/// Submit a new listing. It starts PENDING with no drafts and no links.
pub async fn create_submission(
    input: CreateSubmissionInput,
    actor: UserId,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    let errors = validate_create(&input);
    if !errors.is_empty() {
        return Err(SubmissionError::Validation(errors));
    }

    let now = now_micros();
    let new_submission = NewSubmission {
        status: SubmissionStatus::Pending,
        google_maps_url: input.google_maps_url.trim().to_string(),
        healthcare_professional_name: input.healthcare_professional_name.trim().to_string(),
        spoken_languages: input.spoken_languages,
        notes: input.notes.unwrap_or_default(),
        autofill_place_from_submission_url: false,
        facility_draft: None,
        healthcare_professional_drafts: None,
        facility_id: None,
        healthcare_professional_id: None,
        created_date: now,
        updated_date: now,
    };

    let submission = deps
        .submissions
        .insert(new_submission)
        .await
        .map_err(SubmissionError::Internal)?;

    let mut saga = Compensations::new();
    let store = deps.submissions.clone();
    let id = submission.id;
    saga.push("delete inserted submission", move || async move {
        store.delete(id).await
    });

    let outcome = async {
        let entry = NewAuditLogEntry::new(
            AuditAction::Create,
            AuditObjectType::Submission,
            actor,
            None,
            Some(&submission),
        )?;
        deps.audit_log.record(entry).await
    }
    .await;

    settle(saga, "createSubmission", outcome).await?;

    info!(submission_id = %submission.id, actor_id = %actor, "Submission created");
    Ok(submission)
}
