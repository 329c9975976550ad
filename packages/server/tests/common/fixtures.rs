//! Test fixtures for creating test data.

use directory_core::common::{Contact, FacilityId, Locale, LocalizedName, UserId};
use directory_core::domains::facilities::CreateFacility;
use directory_core::domains::healthcare_professionals::CreateHealthcareProfessional;
use directory_core::domains::submissions::activities::{create_submission, update_submission};
use directory_core::domains::submissions::{
    CreateSubmissionInput, Submission, UpdateSubmissionInput,
};
use directory_core::kernel::{PlaceDetails, ServerDeps};

pub const MAPS_URL: &str = "https://www.google.com/maps/place/Aoba+Clinic/@35.67,139.70,17z";

/// The canonical contributor submission: Jane Doe, English speaking
pub fn jane_doe() -> CreateSubmissionInput {
    CreateSubmissionInput::builder()
        .google_maps_url(MAPS_URL)
        .healthcare_professional_name("Jane Doe")
        .spoken_languages(vec!["en".to_string()])
        .build()
}

/// Create a submission and fail the test if that does not work
pub async fn create_pending(
    input: CreateSubmissionInput,
    actor: UserId,
    deps: &ServerDeps,
) -> Submission {
    create_submission(input, actor, deps)
        .await
        .expect("Failed to create submission")
}

/// Apply an update and fail the test if that does not work
pub async fn update_ok(
    submission: &Submission,
    input: UpdateSubmissionInput,
    actor: UserId,
    deps: &ServerDeps,
) -> Submission {
    update_submission(submission.id.to_string(), input, actor, deps)
        .await
        .expect("Failed to update submission")
}

/// What a successful place lookup returns for MAPS_URL
pub fn aoba_clinic() -> PlaceDetails {
    PlaceDetails {
        name_en: Some("Aoba Clinic".to_string()),
        name_ja: Some("青葉クリニック".to_string()),
        postal_code: Some("150-0001".to_string()),
        prefecture: Some("Tokyo".to_string()),
        city: Some("Shibuya".to_string()),
        phone: Some("03-0000-0000".to_string()),
        latitude: Some(35.67),
        longitude: Some(139.70),
        google_maps_url: Some("https://maps.google.com/?cid=42".to_string()),
        ..Default::default()
    }
}

pub fn existing_facility() -> CreateFacility {
    CreateFacility {
        name_en: "Sakura Hospital".to_string(),
        name_ja: "さくら病院".to_string(),
        contact: Contact::with_map_url("https://maps.google.com/?cid=7"),
        map_latitude: 35.0,
        map_longitude: 135.0,
    }
}

pub fn existing_professional(facility_id: FacilityId) -> CreateHealthcareProfessional {
    CreateHealthcareProfessional {
        names: vec![LocalizedName {
            first_name: "Taro".to_string(),
            middle_name: None,
            last_name: "Yamada".to_string(),
            locale: Locale::Japanese,
        }],
        spoken_languages: vec!["ja".to_string()],
        degrees: vec!["MD".to_string()],
        specialties: vec![],
        accepted_insurance: vec![],
        additional_info_for_patients: None,
        facility_ids: vec![facility_id],
    }
}
