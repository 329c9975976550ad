//! Patch building for submissions.
//!
//! Every write to an existing submission goes through [`SubmissionPatch::build`]:
//! it takes the pre-image read immediately before the write and a sparse
//! [`SubmissionChanges`], and produces a value for every mutable column. A
//! field the change-set leaves untouched keeps its stored value, never null.
//!
//! Compensation reuses the same builder with an empty change-set and the
//! pre-image's own timestamp ([`SubmissionPatch::restore`]).

use chrono::{DateTime, Utc};

use super::drafts::{FacilityDraft, HealthcareProfessionalDraft};
use super::status::SubmissionStatus;
use super::submission::Submission;
use crate::common::{FacilityId, HealthcareProfessionalId};

/// Sparse set of changes. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionChanges {
    pub status: Option<SubmissionStatus>,
    pub google_maps_url: Option<String>,
    pub healthcare_professional_name: Option<String>,
    pub spoken_languages: Option<Vec<String>>,
    pub notes: Option<String>,
    pub autofill_place_from_submission_url: Option<bool>,
    pub facility_draft: Option<FacilityDraft>,
    pub healthcare_professional_drafts: Option<Vec<HealthcareProfessionalDraft>>,
    pub facility_id: Option<FacilityId>,
    pub healthcare_professional_id: Option<HealthcareProfessionalId>,
}

/// Full replacement value for every mutable column of a submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPatch {
    pub status: SubmissionStatus,
    pub google_maps_url: String,
    pub healthcare_professional_name: String,
    pub spoken_languages: Vec<String>,
    pub notes: String,
    pub autofill_place_from_submission_url: bool,
    pub facility_draft: Option<FacilityDraft>,
    pub healthcare_professional_drafts: Option<Vec<HealthcareProfessionalDraft>>,
    pub facility_id: Option<FacilityId>,
    pub healthcare_professional_id: Option<HealthcareProfessionalId>,
    pub updated_date: DateTime<Utc>,
}

impl SubmissionPatch {
    /// Resolve `changes` against `pre_image`, stamping `updated_date`.
    pub fn build(
        pre_image: &Submission,
        changes: &SubmissionChanges,
        updated_date: DateTime<Utc>,
    ) -> Self {
        Self {
            status: changes.status.unwrap_or(pre_image.status),
            google_maps_url: changes
                .google_maps_url
                .clone()
                .unwrap_or_else(|| pre_image.google_maps_url.clone()),
            healthcare_professional_name: changes
                .healthcare_professional_name
                .clone()
                .unwrap_or_else(|| pre_image.healthcare_professional_name.clone()),
            spoken_languages: changes
                .spoken_languages
                .clone()
                .unwrap_or_else(|| pre_image.spoken_languages.clone()),
            notes: changes
                .notes
                .clone()
                .unwrap_or_else(|| pre_image.notes.clone()),
            autofill_place_from_submission_url: changes
                .autofill_place_from_submission_url
                .unwrap_or(pre_image.autofill_place_from_submission_url),
            facility_draft: changes
                .facility_draft
                .clone()
                .or_else(|| pre_image.facility_draft.clone()),
            healthcare_professional_drafts: changes
                .healthcare_professional_drafts
                .clone()
                .or_else(|| pre_image.healthcare_professional_drafts.clone()),
            facility_id: changes.facility_id.or(pre_image.facility_id),
            healthcare_professional_id: changes
                .healthcare_professional_id
                .or(pre_image.healthcare_professional_id),
            updated_date,
        }
    }

    /// Patch that puts every mutable column back to the pre-image.
    ///
    /// The status is re-derived from the pre-image's public flags so the
    /// restored row is exactly what a reader saw before the failed operation.
    pub fn restore(pre_image: &Submission) -> Self {
        let changes = SubmissionChanges {
            status: SubmissionStatus::from_flags(pre_image.status.flags()),
            ..Default::default()
        };
        Self::build(pre_image, &changes, pre_image.updated_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SubmissionId;
    use chrono::Duration;

    fn pre_image() -> Submission {
        let created = Utc::now() - Duration::days(3);
        Submission {
            id: SubmissionId::new(),
            status: SubmissionStatus::Pending,
            google_maps_url: "https://maps.example/x".to_string(),
            healthcare_professional_name: "Jane Doe".to_string(),
            spoken_languages: vec!["en".to_string()],
            notes: "open on saturdays".to_string(),
            autofill_place_from_submission_url: false,
            facility_draft: None,
            healthcare_professional_drafts: None,
            facility_id: None,
            healthcare_professional_id: None,
            created_date: created,
            updated_date: created,
        }
    }

    #[test]
    fn untouched_fields_keep_stored_values() {
        let current = pre_image();
        let now = Utc::now();
        let changes = SubmissionChanges {
            notes: Some("closed on sundays".to_string()),
            ..Default::default()
        };

        let patch = SubmissionPatch::build(&current, &changes, now);

        assert_eq!(patch.notes, "closed on sundays");
        assert_eq!(patch.google_maps_url, current.google_maps_url);
        assert_eq!(patch.healthcare_professional_name, current.healthcare_professional_name);
        assert_eq!(patch.spoken_languages, current.spoken_languages);
        assert_eq!(patch.status, current.status);
        assert_eq!(patch.updated_date, now);
    }

    #[test]
    fn restore_reproduces_the_pre_image() {
        let current = pre_image();
        let patch = SubmissionPatch::restore(&current);

        let mut mutated = current.clone();
        mutated.status = SubmissionStatus::Approved;
        mutated.facility_id = Some(FacilityId::new());
        mutated.updated_date = Utc::now();
        mutated.apply(&patch);

        assert_eq!(mutated, current);
    }
}
