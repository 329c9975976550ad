// Value types shared by submissions, facilities and healthcare professionals.
//
// These live in common so drafts (embedded in a submission) and the durable
// aggregates built from them use the same shapes.

use serde::{Deserialize, Serialize};

/// Locales the directory publishes names and addresses in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Locale {
    #[serde(rename = "en_US")]
    English,
    #[serde(rename = "ja_JP")]
    Japanese,
}

/// A person's name in one locale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub locale: Locale,
}

/// Postal address, stored in both locales
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAddress {
    pub postal_code: String,
    pub prefecture_en: String,
    pub city_en: String,
    pub address_line1_en: String,
    pub address_line2_en: String,
    pub prefecture_ja: String,
    pub city_ja: String,
    pub address_line1_ja: String,
    pub address_line2_ja: String,
}

/// Contact details of a durable facility
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub google_maps_url: String,
    pub email: Option<String>,
    pub phone: String,
    pub website: Option<String>,
    pub address: PhysicalAddress,
}

impl Contact {
    /// Blank contact that only carries the map link.
    pub fn with_map_url(google_maps_url: impl Into<String>) -> Self {
        Self {
            google_maps_url: google_maps_url.into(),
            ..Default::default()
        }
    }
}
