use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::{FacilityId, HealthcareProfessionalId, LocalizedName};

/// HealthcareProfessional model - a practitioner linked to one or more facilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareProfessional {
    pub id: HealthcareProfessionalId,
    pub names: Vec<LocalizedName>,
    pub spoken_languages: Vec<String>,
    pub degrees: Vec<String>,
    pub specialties: Vec<String>,
    pub accepted_insurance: Vec<String>,
    pub additional_info_for_patients: Option<String>,
    pub facility_ids: Vec<FacilityId>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Input for creating a new healthcare professional
#[derive(Debug, Clone, PartialEq)]
pub struct CreateHealthcareProfessional {
    pub names: Vec<LocalizedName>,
    pub spoken_languages: Vec<String>,
    pub degrees: Vec<String>,
    pub specialties: Vec<String>,
    pub accepted_insurance: Vec<String>,
    pub additional_info_for_patients: Option<String>,
    pub facility_ids: Vec<FacilityId>,
}

impl CreateHealthcareProfessional {
    /// A usable professional needs at least one name with a first and last part.
    pub fn has_minimal_name(&self) -> bool {
        self.names.first().is_some_and(|name| {
            !name.first_name.trim().is_empty() && !name.last_name.trim().is_empty()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.has_minimal_name() {
            anyhow::bail!("Healthcare professional requires a first and last name");
        }
        if self.facility_ids.is_empty() {
            anyhow::bail!("Healthcare professional must belong to at least one facility");
        }
        Ok(())
    }

    pub fn into_healthcare_professional(
        self,
        id: HealthcareProfessionalId,
        now: DateTime<Utc>,
    ) -> HealthcareProfessional {
        HealthcareProfessional {
            id,
            names: self.names,
            spoken_languages: self.spoken_languages,
            degrees: self.degrees,
            specialties: self.specialties,
            accepted_insurance: self.accepted_insurance,
            additional_info_for_patients: self.additional_info_for_patients,
            facility_ids: self.facility_ids,
            created_date: now,
            updated_date: now,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HealthcareProfessionalRow {
    id: HealthcareProfessionalId,
    names: Json<Vec<LocalizedName>>,
    spoken_languages: Vec<String>,
    degrees: Vec<String>,
    specialties: Vec<String>,
    accepted_insurance: Vec<String>,
    additional_info_for_patients: Option<String>,
    facility_ids: Vec<FacilityId>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl From<HealthcareProfessionalRow> for HealthcareProfessional {
    fn from(row: HealthcareProfessionalRow) -> Self {
        Self {
            id: row.id,
            names: row.names.0,
            spoken_languages: row.spoken_languages,
            degrees: row.degrees,
            specialties: row.specialties,
            accepted_insurance: row.accepted_insurance,
            additional_info_for_patients: row.additional_info_for_patients,
            facility_ids: row.facility_ids,
            created_date: row.created_date,
            updated_date: row.updated_date,
        }
    }
}

impl HealthcareProfessional {
    /// Find healthcare professional by ID, returning None if not found
    pub async fn find_by_id_optional(
        id: HealthcareProfessionalId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, HealthcareProfessionalRow>(
            "SELECT * FROM healthcare_professionals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Self::from))
    }

    /// Create a new healthcare professional
    pub async fn create(input: CreateHealthcareProfessional, pool: &PgPool) -> Result<Self> {
        input.validate()?;

        let row = sqlx::query_as::<_, HealthcareProfessionalRow>(
            r#"
            INSERT INTO healthcare_professionals (
                id, names, spoken_languages, degrees, specialties,
                accepted_insurance, additional_info_for_patients, facility_ids,
                created_date, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(HealthcareProfessionalId::new())
        .bind(Json(&input.names))
        .bind(&input.spoken_languages)
        .bind(&input.degrees)
        .bind(&input.specialties)
        .bind(&input.accepted_insurance)
        .bind(&input.additional_info_for_patients)
        .bind(&input.facility_ids)
        .fetch_one(pool)
        .await
        .context("Failed to insert healthcare professional")?;

        Ok(row.into())
    }

    /// Delete a healthcare professional
    pub async fn delete(id: HealthcareProfessionalId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM healthcare_professionals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
