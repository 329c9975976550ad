//! Deriving a healthcare professional from a submission on approval.
//!
//! Source priority:
//! 1. the first draft, when it carries names;
//! 2. the first draft's other fields plus the parsed display name;
//! 3. no draft at all: the parsed display name and the submission's languages.
//!
//! Anything else creates nothing. None of this can fail an approval.

use tracing::{info, warn};

use crate::common::{parse_display_name, FacilityId, Locale, UserId};
use crate::domains::healthcare_professionals::{
    CreateHealthcareProfessional, HealthcareProfessional,
};
use crate::domains::submissions::models::Submission;
use crate::kernel::ServerDeps;

/// Input for the professional a submission describes, if it describes one.
pub fn healthcare_professional_input(
    submission: &Submission,
    facility_id: FacilityId,
) -> Option<CreateHealthcareProfessional> {
    let first_draft = submission
        .healthcare_professional_drafts
        .as_ref()
        .and_then(|drafts| drafts.first());

    let parsed_name = || {
        parse_display_name(&submission.healthcare_professional_name)
            .map(|parsed| parsed.into_localized(Locale::English))
    };

    let input = match first_draft {
        Some(draft) => {
            let names = match draft.non_empty_names() {
                Some(names) => names.to_vec(),
                None => vec![parsed_name()?],
            };
            CreateHealthcareProfessional {
                names,
                spoken_languages: draft
                    .spoken_languages
                    .clone()
                    .unwrap_or_else(|| submission.spoken_languages.clone()),
                degrees: draft.degrees.clone().unwrap_or_default(),
                specialties: draft.specialties.clone().unwrap_or_default(),
                accepted_insurance: draft.accepted_insurance.clone().unwrap_or_default(),
                additional_info_for_patients: draft.additional_info_for_patients.clone(),
                facility_ids: vec![facility_id],
            }
        }
        None => CreateHealthcareProfessional {
            names: vec![parsed_name()?],
            spoken_languages: submission.spoken_languages.clone(),
            degrees: Vec::new(),
            specialties: Vec::new(),
            accepted_insurance: Vec::new(),
            additional_info_for_patients: None,
            facility_ids: vec![facility_id],
        },
    };

    Some(input)
}

/// Create the professional for an approval. `None` when there is nothing to
/// create or creating it failed; both are logged and neither is an error.
pub async fn create_healthcare_professional_for(
    submission: &Submission,
    facility_id: FacilityId,
    actor: UserId,
    deps: &ServerDeps,
) -> Option<HealthcareProfessional> {
    let Some(input) = healthcare_professional_input(submission, facility_id) else {
        info!(
            submission_id = %submission.id,
            "No healthcare professional details on submission, skipping"
        );
        return None;
    };

    if !input.has_minimal_name() {
        warn!(
            submission_id = %submission.id,
            "Healthcare professional draft lacks a first and last name, skipping"
        );
        return None;
    }

    match deps.healthcare_professionals.create(input, actor).await {
        Ok(professional) => {
            info!(
                submission_id = %submission.id,
                healthcare_professional_id = %professional.id,
                "Healthcare professional created from submission"
            );
            Some(professional)
        }
        Err(e) => {
            warn!(
                submission_id = %submission.id,
                error = %e,
                "Failed to create healthcare professional, approving without one"
            );
            None
        }
    }
}
