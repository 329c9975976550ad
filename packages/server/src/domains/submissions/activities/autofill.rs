use tracing::{info, warn};

use super::{load, parse_submission_id, push_restore, reload, settle};
use crate::common::{now_micros, UserId};
use crate::domains::audit::{AuditAction, AuditObjectType, NewAuditLogEntry};
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::{
    AddressDraft, ContactDraft, FacilityDraft, Submission, SubmissionChanges, SubmissionPatch,
    SubmissionStatus,
};
use crate::kernel::{Compensations, PlaceDetails, ServerDeps};

/// Enrich a submission from its maps URL and move it to UNDER_REVIEW.
///
/// Sets the autofill latch; a submission can only be autofilled once.
pub async fn autofill_places_information(
    submission_id: String,
    google_maps_url: String,
    actor: UserId,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    let id = parse_submission_id(&submission_id)?;
    let current = load(id, deps).await?;

    if current.autofill_place_from_submission_url {
        return Err(SubmissionError::AutofillFailure(
            "submission was already autofilled".to_string(),
        ));
    }

    let google_maps_url = google_maps_url.trim();
    if google_maps_url.is_empty() {
        return Err(SubmissionError::AutofillFailure(
            "no maps URL to look up".to_string(),
        ));
    }

    let place = match deps.place_lookup.lookup(google_maps_url).await {
        Ok(Some(place)) => place,
        Ok(None) => {
            info!(submission_id = %id, "Place lookup found nothing");
            return Err(SubmissionError::AutofillFailure(
                "no place found for maps URL".to_string(),
            ));
        }
        Err(e) => {
            warn!(submission_id = %id, error = %e, "Place lookup failed");
            return Err(SubmissionError::AutofillFailure(
                "place lookup failed".to_string(),
            ));
        }
    };

    let changes = SubmissionChanges {
        status: Some(SubmissionStatus::UnderReview),
        google_maps_url: Some(
            place
                .google_maps_url
                .clone()
                .unwrap_or_else(|| current.google_maps_url.clone()),
        ),
        autofill_place_from_submission_url: Some(true),
        facility_draft: Some(facility_draft_from_place(&place)),
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

    let updated = settle(saga, "autoFillPlacesInformation", outcome).await?;

    info!(submission_id = %id, actor_id = %actor, "Submission autofilled from place lookup");
    Ok(updated)
}

/// Facility draft holding exactly what the lookup returned.
pub fn facility_draft_from_place(place: &PlaceDetails) -> FacilityDraft {
    let address = AddressDraft {
        postal_code: place.postal_code.clone(),
        prefecture_en: place.prefecture.clone(),
        city_en: place.city.clone(),
        address_line1_en: place.address_line1.clone(),
        address_line2_en: place.address_line2.clone(),
        ..Default::default()
    };

    FacilityDraft {
        name_en: place.name_en.clone(),
        name_ja: place.name_ja.clone(),
        contact: Some(ContactDraft {
            google_maps_url: place.google_maps_url.clone(),
            email: None,
            phone: place.phone.clone(),
            website: place.website.clone(),
            address: (address != AddressDraft::default()).then_some(address),
        }),
        map_latitude: place.latitude,
        map_longitude: place.longitude,
    }
}
