use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::{Contact, FacilityId};

/// Facility model - a published directory facility
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: FacilityId,
    pub name_en: String,
    pub name_ja: String,
    pub contact: Contact,
    pub map_latitude: f64,
    pub map_longitude: f64,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Input for creating a new facility
#[derive(Debug, Clone, PartialEq)]
pub struct CreateFacility {
    pub name_en: String,
    pub name_ja: String,
    pub contact: Contact,
    pub map_latitude: f64,
    pub map_longitude: f64,
}

impl CreateFacility {
    /// Name used when a submission carries no facility details at all.
    pub const UNKNOWN_NAME: &'static str = "Unknown Facility";

    /// Minimal facility: unknown name in both locales, contact seeded only
    /// with the map URL, zeroed coordinates.
    pub fn placeholder(google_maps_url: &str) -> Self {
        Self {
            name_en: Self::UNKNOWN_NAME.to_string(),
            name_ja: Self::UNKNOWN_NAME.to_string(),
            contact: Contact::with_map_url(google_maps_url),
            map_latitude: 0.0,
            map_longitude: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name_en.trim().is_empty() || self.name_ja.trim().is_empty() {
            anyhow::bail!("Facility requires a name in both locales");
        }
        if !(-90.0..=90.0).contains(&self.map_latitude)
            || !(-180.0..=180.0).contains(&self.map_longitude)
        {
            anyhow::bail!(
                "Facility coordinates out of range: ({}, {})",
                self.map_latitude,
                self.map_longitude
            );
        }
        Ok(())
    }

    pub fn into_facility(self, id: FacilityId, now: DateTime<Utc>) -> Facility {
        Facility {
            id,
            name_en: self.name_en,
            name_ja: self.name_ja,
            contact: self.contact,
            map_latitude: self.map_latitude,
            map_longitude: self.map_longitude,
            created_date: now,
            updated_date: now,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FacilityRow {
    id: FacilityId,
    name_en: String,
    name_ja: String,
    contact: Json<Contact>,
    map_latitude: f64,
    map_longitude: f64,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl From<FacilityRow> for Facility {
    fn from(row: FacilityRow) -> Self {
        Self {
            id: row.id,
            name_en: row.name_en,
            name_ja: row.name_ja,
            contact: row.contact.0,
            map_latitude: row.map_latitude,
            map_longitude: row.map_longitude,
            created_date: row.created_date,
            updated_date: row.updated_date,
        }
    }
}

impl Facility {
    /// Find facility by ID, returning None if not found
    pub async fn find_by_id_optional(id: FacilityId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, FacilityRow>("SELECT * FROM facilities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Self::from))
    }

    /// Create a new facility
    pub async fn create(input: CreateFacility, pool: &PgPool) -> Result<Self> {
        input.validate()?;

        let row = sqlx::query_as::<_, FacilityRow>(
            r#"
            INSERT INTO facilities (
                id, name_en, name_ja, contact, map_latitude, map_longitude,
                created_date, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(FacilityId::new())
        .bind(&input.name_en)
        .bind(&input.name_ja)
        .bind(Json(&input.contact))
        .bind(input.map_latitude)
        .bind(input.map_longitude)
        .fetch_one(pool)
        .await
        .context("Failed to insert facility")?;

        Ok(row.into())
    }

    /// Delete a facility
    pub async fn delete(id: FacilityId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM facilities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_unknown_with_only_the_map_url() {
        let input = CreateFacility::placeholder("https://maps.example/x");
        assert_eq!(input.name_en, "Unknown Facility");
        assert_eq!(input.name_ja, "Unknown Facility");
        assert_eq!(input.contact.google_maps_url, "https://maps.example/x");
        assert!(input.contact.phone.is_empty());
        assert_eq!(input.map_latitude, 0.0);
        assert_eq!(input.map_longitude, 0.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut input = CreateFacility::placeholder("https://maps.example/x");
        input.name_ja = "  ".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut input = CreateFacility::placeholder("https://maps.example/x");
        input.map_latitude = 123.0;
        assert!(input.validate().is_err());
    }
}
