use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::domains::submissions::models::{
    FacilityDraft, HealthcareProfessionalDraft, Submission, SubmissionStatus,
};

/// Submission as exposed to API callers, with the derived status flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    pub id: String,
    pub status: SubmissionStatus,
    pub is_under_review: bool,
    pub is_approved: bool,
    pub is_rejected: bool,

    pub google_maps_url: String,
    pub healthcare_professional_name: String,
    pub spoken_languages: Vec<String>,
    pub notes: String,

    pub autofill_place_from_submission_url: bool,
    pub facility_draft: Option<FacilityDraft>,
    pub healthcare_professional_drafts: Option<Vec<HealthcareProfessionalDraft>>,

    pub facility_id: Option<String>,
    pub healthcare_professional_id: Option<String>,

    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl From<Submission> for SubmissionData {
    fn from(submission: Submission) -> Self {
        let flags = submission.status.flags();
        Self {
            id: submission.id.to_string(),
            status: submission.status,
            is_under_review: flags.is_under_review,
            is_approved: flags.is_approved,
            is_rejected: flags.is_rejected,
            google_maps_url: submission.google_maps_url,
            healthcare_professional_name: submission.healthcare_professional_name,
            spoken_languages: submission.spoken_languages,
            notes: submission.notes,
            autofill_place_from_submission_url: submission.autofill_place_from_submission_url,
            facility_draft: submission.facility_draft,
            healthcare_professional_drafts: submission.healthcare_professional_drafts,
            facility_id: submission.facility_id.map(|id| id.to_string()),
            healthcare_professional_id: submission
                .healthcare_professional_id
                .map(|id| id.to_string()),
            created_date: submission.created_date,
            updated_date: submission.updated_date,
        }
    }
}

/// Input for submitting a new listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(default, setter(into)))]
pub struct CreateSubmissionInput {
    #[serde(default)]
    pub google_maps_url: String,
    #[serde(default)]
    pub healthcare_professional_name: String,
    #[serde(default)]
    pub spoken_languages: Vec<String>,
    #[serde(default)]
    #[builder(setter(strip_option))]
    pub notes: Option<String>,
}

/// Sparse update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(default, setter(strip_option, into)))]
pub struct UpdateSubmissionInput {
    #[serde(default)]
    pub google_maps_url: Option<String>,
    #[serde(default)]
    pub healthcare_professional_name: Option<String>,
    #[serde(default)]
    pub spoken_languages: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,

    // Status flags; only `true` requests a transition
    #[serde(default)]
    pub is_under_review: Option<bool>,
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub is_rejected: Option<bool>,

    #[serde(default)]
    pub autofill_place_from_submission_url: Option<bool>,
    #[serde(default)]
    pub facility_draft: Option<FacilityDraft>,
    #[serde(default)]
    pub healthcare_professional_drafts: Option<Vec<HealthcareProfessionalDraft>>,
}

impl UpdateSubmissionInput {
    pub fn requests_approval(&self) -> bool {
        self.is_approved == Some(true)
    }

    pub fn requests_autofill(&self) -> bool {
        self.autofill_place_from_submission_url == Some(true)
    }
}
