//! Field rules for submission input.
//!
//! Pure functions: they look only at the input and report every violated
//! rule as a [`FieldError`]. No rule here ever touches the store.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::common::{ErrorCode, FieldError, SubmissionId};
use crate::domains::submissions::data::{CreateSubmissionInput, UpdateSubmissionInput};

pub const MAX_ID_LENGTH: usize = 128;
pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_NAME_LENGTH: usize = 128;
pub const MAX_NOTES_LENGTH: usize = 2048;
pub const MAX_LANGUAGE_LENGTH: usize = 32;
pub const MAX_LANGUAGES: usize = 20;

lazy_static! {
    // Control characters and template/markup delimiters
    static ref INVALID_NAME_CHARS: Regex = Regex::new(r"[\p{Cc}<>{}]").unwrap();
}

/// Shape check for an id coming from a caller. Length is checked before parsing.
pub fn validate_id(raw: &str) -> Result<SubmissionId, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > MAX_ID_LENGTH {
        return Err(FieldError::new("id", ErrorCode::InvalidId));
    }
    SubmissionId::parse(raw).map_err(|_| FieldError::new("id", ErrorCode::InvalidId))
}

pub fn validate_create(input: &CreateSubmissionInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if input.google_maps_url.trim().is_empty() {
        errors.push(FieldError::new("googleMapsUrl", ErrorCode::Required));
    } else {
        check_url(&input.google_maps_url, &mut errors);
    }
    check_name(&input.healthcare_professional_name, &mut errors);
    check_languages(&input.spoken_languages, &mut errors);
    if let Some(notes) = &input.notes {
        check_notes(notes, &mut errors);
    }

    errors
}

/// Only the fields present in the update are checked.
pub fn validate_update(input: &UpdateSubmissionInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(url) = &input.google_maps_url {
        if url.trim().is_empty() {
            errors.push(FieldError::new("googleMapsUrl", ErrorCode::MissingInput));
        } else {
            check_url(url, &mut errors);
        }
    }
    if let Some(name) = &input.healthcare_professional_name {
        check_name(name, &mut errors);
    }
    if let Some(languages) = &input.spoken_languages {
        check_languages(languages, &mut errors);
    }
    if let Some(notes) = &input.notes {
        check_notes(notes, &mut errors);
    }

    errors
}

fn check_url(url: &str, errors: &mut Vec<FieldError>) {
    if url.chars().count() > MAX_URL_LENGTH {
        errors.push(FieldError::new("googleMapsUrl", ErrorCode::InvalidLengthTooLong));
        return;
    }
    let parsed = Url::parse(url.trim());
    if !matches!(parsed, Ok(ref u) if u.scheme() == "http" || u.scheme() == "https") {
        errors.push(FieldError::new("googleMapsUrl", ErrorCode::InvalidUrl));
    }
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "healthcareProfessionalName",
            ErrorCode::InvalidLengthTooLong,
        ));
    }
    if INVALID_NAME_CHARS.is_match(name) {
        errors.push(FieldError::new(
            "healthcareProfessionalName",
            ErrorCode::ContainsInvalidCharacter,
        ));
    }
}

fn check_languages(languages: &[String], errors: &mut Vec<FieldError>) {
    if languages.len() > MAX_LANGUAGES {
        errors.push(FieldError::new("spokenLanguages", ErrorCode::InvalidLengthTooLong));
    }
    if languages.iter().any(|l| l.trim().is_empty()) {
        errors.push(FieldError::new("spokenLanguages", ErrorCode::InvalidLengthTooShort));
    }
    if languages
        .iter()
        .any(|l| l.chars().count() > MAX_LANGUAGE_LENGTH)
    {
        errors.push(FieldError::new("spokenLanguages", ErrorCode::InvalidLengthTooLong));
    }
}

fn check_notes(notes: &str, errors: &mut Vec<FieldError>) {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        errors.push(FieldError::new("notes", ErrorCode::InvalidLengthTooLong));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateSubmissionInput {
        CreateSubmissionInput::builder()
            .google_maps_url("https://maps.google.com/?q=Aoba+Clinic")
            .healthcare_professional_name("Jane Doe")
            .spoken_languages(vec!["en".to_string(), "ja".to_string()])
            .build()
    }

    fn codes(errors: &[FieldError]) -> Vec<(&str, ErrorCode)> {
        errors
            .iter()
            .map(|e| (e.field.as_str(), e.error_code))
            .collect()
    }

    #[test]
    fn valid_create_has_no_errors() {
        assert!(validate_create(&valid_create()).is_empty());
    }

    #[test]
    fn create_requires_a_url() {
        let mut input = valid_create();
        input.google_maps_url = "   ".to_string();
        assert_eq!(
            codes(&validate_create(&input)),
            vec![("googleMapsUrl", ErrorCode::Required)]
        );
    }

    #[test]
    fn non_http_url_is_invalid() {
        let mut input = valid_create();
        input.google_maps_url = "ftp://maps.example/x".to_string();
        assert_eq!(
            codes(&validate_create(&input)),
            vec![("googleMapsUrl", ErrorCode::InvalidUrl)]
        );
    }

    #[test]
    fn markup_in_name_is_rejected() {
        let mut input = valid_create();
        input.healthcare_professional_name = "<script>".to_string();
        assert_eq!(
            codes(&validate_create(&input)),
            vec![("healthcareProfessionalName", ErrorCode::ContainsInvalidCharacter)]
        );
    }

    #[test]
    fn long_notes_and_blank_language_are_both_reported() {
        let mut input = valid_create();
        input.notes = Some("x".repeat(MAX_NOTES_LENGTH + 1));
        input.spoken_languages.push(" ".to_string());
        assert_eq!(
            codes(&validate_create(&input)),
            vec![
                ("spokenLanguages", ErrorCode::InvalidLengthTooShort),
                ("notes", ErrorCode::InvalidLengthTooLong),
            ]
        );
    }

    #[test]
    fn too_many_languages() {
        let mut input = valid_create();
        input.spoken_languages = (0..=MAX_LANGUAGES).map(|i| format!("l{i}")).collect();
        assert_eq!(
            codes(&validate_create(&input)),
            vec![("spokenLanguages", ErrorCode::InvalidLengthTooLong)]
        );
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(validate_update(&UpdateSubmissionInput::default()).is_empty());
    }

    #[test]
    fn update_with_blank_url_is_missing_input() {
        let input = UpdateSubmissionInput::builder().google_maps_url("").build();
        assert_eq!(
            codes(&validate_update(&input)),
            vec![("googleMapsUrl", ErrorCode::MissingInput)]
        );
    }

    #[test]
    fn id_shape() {
        let id = SubmissionId::new();
        assert_eq!(validate_id(&id.to_string()).unwrap(), id);
        assert!(validate_id("not-a-uuid").is_err());
        assert!(validate_id("").is_err());
        assert_eq!(
            validate_id(&"a".repeat(MAX_ID_LENGTH + 1)).unwrap_err().error_code,
            ErrorCode::InvalidId
        );
    }
}
