use tracing::{error, info};

use super::{create_healthcare_professional_for, load, parse_submission_id};
use super::{push_restore, reload, settle};
use crate::common::{now_micros, Contact, PhysicalAddress, UserId};
use crate::domains::audit::{AuditAction, AuditObjectType, NewAuditLogEntry};
use crate::domains::facilities::CreateFacility;
use crate::domains::submissions::error::SubmissionError;
use crate::domains::submissions::models::{
    FacilityDraft, Submission, SubmissionChanges, SubmissionPatch, SubmissionStatus,
};
use crate::kernel::{Compensations, ServerDeps};

/// Approve a submission, materializing its facility and professional.
///
/// Linked ids are reused. Anything this call creates is audited together
/// with the submission, and deleted again if a step after the submission write
/// fails; reused entities are never touched.
pub async fn approve_submission(
    submission_id: String,
    actor: UserId,
    deps: &ServerDeps,
) -> Result<Submission, SubmissionError> {
    let id = parse_submission_id(&submission_id)?;
    let current = load(id, deps).await?;

    if current.status.is_approved() {
        return Err(SubmissionError::AlreadyApproved(id));
    }

    info!(submission_id = %id, actor_id = %actor, "Approving submission");

    // Registered first so it is undone last, after any created children.
    let mut saga = Compensations::new();
    push_restore(&mut saga, &current, deps);

    let mut created_facility = None;
    let facility_id = match current.facility_id {
        Some(facility_id) => facility_id,
        None => {
            let facility = deps
                .facilities
                .create(facility_input(&current), actor)
                .await
                .map_err(|e| {
                    error!(submission_id = %id, error = %e, "Failed to create facility");
                    SubmissionError::Internal(e)
                })?;

            let facilities = deps.facilities.clone();
            let created = facility.id;
            saga.push("delete created facility", move || async move {
                facilities.delete(created).await
            });
            info!(submission_id = %id, facility_id = %created, "Facility created for approval");
            created_facility = Some(facility);
            created
        }
    };

    let mut created_professional = None;
    let healthcare_professional_id = match current.healthcare_professional_id {
        Some(existing) => Some(existing),
        None => {
            let created =
                create_healthcare_professional_for(&current, facility_id, actor, deps).await;
            let created_id = created.as_ref().map(|professional| professional.id);
            if let Some(created_id) = created_id {
                let professionals = deps.healthcare_professionals.clone();
                saga.push("delete created healthcare professional", move || async move {
                    professionals.delete(created_id).await
                });
            }
            created_professional = created;
            created_id
        }
    };

    let changes = SubmissionChanges {
        status: Some(SubmissionStatus::Approved),
        facility_id: Some(facility_id),
        healthcare_professional_id,
        ..Default::default()
    };
    let patch = SubmissionPatch::build(&current, &changes, now_micros());

    // Children may already exist, so even a failed write is compensated.
    let outcome = async {
        deps.submissions.patch(id, &patch).await?;
        let approved = reload(id, deps).await?;
        if let Some(facility) = &created_facility {
            let entry = NewAuditLogEntry::new(
                AuditAction::Create,
                AuditObjectType::Facility,
                actor,
                None,
                Some(facility),
            )?;
            deps.audit_log.record(entry).await?;
        }
        if let Some(professional) = &created_professional {
            let entry = NewAuditLogEntry::new(
                AuditAction::Create,
                AuditObjectType::HealthcareProfessional,
                actor,
                None,
                Some(professional),
            )?;
            deps.audit_log.record(entry).await?;
        }
        let entry = NewAuditLogEntry::new(
            AuditAction::Update,
            AuditObjectType::Submission,
            actor,
            Some(&current),
            Some(&approved),
        )?;
        deps.audit_log.record(entry).await?;
        Ok::<_, anyhow::Error>(approved)
    }
    .await;

    let approved = settle(saga, "approveSubmission", outcome).await?;

    info!(
        submission_id = %id,
        facility_id = %facility_id,
        healthcare_professional_id = ?approved.healthcare_professional_id,
        "Submission approved"
    );
    Ok(approved)
}

/// Facility input from the submission's draft, or a placeholder when there
/// is none. Missing names become "Unknown Facility", missing coordinates 0.
pub fn facility_input(submission: &Submission) -> CreateFacility {
    let Some(draft) = &submission.facility_draft else {
        return CreateFacility::placeholder(&submission.google_maps_url);
    };

    let name = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(CreateFacility::UNKNOWN_NAME)
            .to_string()
    };

    CreateFacility {
        name_en: name(&draft.name_en),
        name_ja: name(&draft.name_ja),
        contact: contact_from_draft(draft, &submission.google_maps_url),
        map_latitude: draft.map_latitude.unwrap_or(0.0),
        map_longitude: draft.map_longitude.unwrap_or(0.0),
    }
}

fn contact_from_draft(draft: &FacilityDraft, fallback_url: &str) -> Contact {
    let Some(contact) = &draft.contact else {
        return Contact::with_map_url(fallback_url);
    };
    let address = contact.address.clone().unwrap_or_default();

    Contact {
        google_maps_url: contact
            .google_maps_url
            .clone()
            .unwrap_or_else(|| fallback_url.to_string()),
        email: contact.email.clone(),
        phone: contact.phone.clone().unwrap_or_default(),
        website: contact.website.clone(),
        address: PhysicalAddress {
            postal_code: address.postal_code.unwrap_or_default(),
            prefecture_en: address.prefecture_en.unwrap_or_default(),
            city_en: address.city_en.unwrap_or_default(),
            address_line1_en: address.address_line1_en.unwrap_or_default(),
            address_line2_en: address.address_line2_en.unwrap_or_default(),
            prefecture_ja: address.prefecture_ja.unwrap_or_default(),
            city_ja: address.city_ja.unwrap_or_default(),
            address_line1_ja: address.address_line1_ja.unwrap_or_default(),
            address_line2_ja: address.address_line2_ja.unwrap_or_default(),
        },
    }
}
