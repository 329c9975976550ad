use tracing::{debug, info};

use super::{approve_submission, autofill_places_information, load, parse_submission_id};
use super::{push_restore, reload, settle};
use crate::common::{now_micros, UserId};
use crate::domains::audit::{AuditAction, AuditObjectType, NewAuditLogEntry};
use crate::domains::submissions::data::UpdateSubmissionInput;
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::{
    Submission, SubmissionChanges, SubmissionPatch, SubmissionStatus,
};
use crate::domains::submissions::validation::validate_update;
use crate::kernel::{Compensations, ServerDeps};

/// Apply a sparse update.
///
/// Dispatch order: `isApproved: true` hands off to [`approve_submission`];
/// `autofillPlaceFromSubmissionUrl: true` hands off to
/// [`autofill_places_information`] (or fails when the latch is already set);
/// everything else is a plain field update.
pub async fn update_submission(
    submission_id: String,
    input: UpdateSubmissionInput,
    actor: UserId,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    let id = parse_submission_id(&submission_id)?;

    let errors = validate_update(&input);
    if !errors.is_empty() {
        return Err(SubmissionError::Validation(errors));
    }

    if input.requests_approval() {
        debug!(submission_id = %id, "Update requests approval, dispatching");
        return approve_submission(submission_id, actor, deps).await;
    }

    let current = load(id, deps).await?;

    if input.requests_autofill() {
        if current.autofill_place_from_submission_url {
            return Err(SubmissionError::AutofillFailure(
                "submission was already autofilled".to_string(),
            ));
        }
        let google_maps_url = input
            .google_maps_url
            .clone()
            .unwrap_or_else(|| current.google_maps_url.clone());
        debug!(submission_id = %id, "Update requests autofill, dispatching");
        return autofill_places_information(submission_id, google_maps_url, actor, deps).await;
    }

    let status = requested_status(&input)?;
    let changes = SubmissionChanges {
        status,
        google_maps_url: input.google_maps_url.map(|url| url.trim().to_string()),
        healthcare_professional_name: input
            .healthcare_professional_name
            .map(|name| name.trim().to_string()),
        spoken_languages: input.spoken_languages,
        notes: input.notes,
        facility_draft: input.facility_draft,
        healthcare_professional_drafts: input.healthcare_professional_drafts,
        ..Default::default()
    };

    let patch = SubmissionPatch::build(&current, &changes, now_micros());
    deps.submissions
        .patch(id, &patch)
        .await
        .map_err(SubmissionError::Internal)?;

    let mut saga = Compensations::new();
    push_restore(&mut saga, &current, deps);

    let outcome = async {
        let updated = reload(id, deps).await?;
        let entry = NewAuditLogEntry::new(
            AuditAction::Update,
            AuditObjectType::Submission,
            actor,
            Some(&current),
            Some(&updated),
        )?;
        deps.audit_log.record(entry).await?;
        Ok::<_, anyhow::Error>(updated)
    }
    .await;

    let updated = settle(saga, "updateSubmission", outcome).await?;

    info!(
        submission_id = %id,
        actor_id = %actor,
        status = %updated.status,
        "Submission updated"
    );
    Ok(updated)
}

/// Status requested by the `true` flags of an update. `false` is a no-op.
fn requested_status(
    input: &UpdateSubmissionInput,
) -> Result<Option<SubmissionStatus>, SubmissionError> {
    match (
        input.is_under_review == Some(true),
        input.is_rejected == Some(true),
    ) {
        (true, true) => Err(SubmissionError::InvalidInput {
            field: "isUnderReview",
            reason: "isUnderReview and isRejected cannot both be true".to_string(),
        }),
        (true, false) => Ok(Some(SubmissionStatus::UnderReview)),
        (false, true) => Ok(Some(SubmissionStatus::Rejected)),
        (false, false) => Ok(None),
    }
}
