//! Draft value objects embedded in a submission.
//!
//! Drafts are partial, unvalidated snapshots of a would-be facility or
//! healthcare professional. They exist only for reviewers to look at before
//! approval turns them into durable aggregates, so every field is optional.

use serde::{Deserialize, Serialize};

use crate::common::LocalizedName;

/// Address fields as far as they are known
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture_ja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_ja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1_ja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2_ja: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressDraft>,
}

/// A facility as far as autofill (or a reviewer) could fill it in
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FacilityDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_longitude: Option<f64>,
}

/// A healthcare professional as far as the contributor described them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareProfessionalDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<LocalizedName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_insurance: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info_for_patients: Option<String>,
}

impl HealthcareProfessionalDraft {
    /// Names, if the draft carries at least one.
    pub fn non_empty_names(&self) -> Option<&[LocalizedName]> {
        self.names.as_deref().filter(|names| !names.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let draft = FacilityDraft {
            name_en: Some("Sakura Clinic".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({ "nameEn": "Sakura Clinic" }));
    }

    #[test]
    fn empty_names_list_counts_as_no_names() {
        let draft = HealthcareProfessionalDraft {
            names: Some(vec![]),
            ..Default::default()
        };
        assert!(draft.non_empty_names().is_none());
    }
}
