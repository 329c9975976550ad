use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use super::drafts::{FacilityDraft, HealthcareProfessionalDraft};
use super::patch::SubmissionPatch;
use super::status::SubmissionStatus;
use crate::common::{FacilityId, HealthcareProfessionalId, SubmissionId};

/// Submission model - a candidate listing awaiting review
///
/// Serialized (camelCase) as the old/new value snapshot on audit entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub status: SubmissionStatus,

    // Submitted content
    pub google_maps_url: String,
    pub healthcare_professional_name: String,
    pub spoken_languages: Vec<String>,
    pub notes: String,

    // Enrichment
    pub autofill_place_from_submission_url: bool,
    pub facility_draft: Option<FacilityDraft>,
    pub healthcare_professional_drafts: Option<Vec<HealthcareProfessionalDraft>>,

    // Links set on approval
    pub facility_id: Option<FacilityId>,
    pub healthcare_professional_id: Option<HealthcareProfessionalId>,

    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// A submission row before the store has assigned its id
#[derive(Debug, Clone)]
pub struct NewSubmission {
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
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl NewSubmission {
    pub fn into_submission(self, id: SubmissionId) -> Submission {
        Submission {
            id,
            status: self.status,
            google_maps_url: self.google_maps_url,
            healthcare_professional_name: self.healthcare_professional_name,
            spoken_languages: self.spoken_languages,
            notes: self.notes,
            autofill_place_from_submission_url: self.autofill_place_from_submission_url,
            facility_draft: self.facility_draft,
            healthcare_professional_drafts: self.healthcare_professional_drafts,
            facility_id: self.facility_id,
            healthcare_professional_id: self.healthcare_professional_id,
            created_date: self.created_date,
            updated_date: self.updated_date,
        }
    }
}

impl Submission {
    /// Overwrite every mutable field with the patch values.
    pub fn apply(&mut self, patch: &SubmissionPatch) {
        self.status = patch.status;
        self.google_maps_url = patch.google_maps_url.clone();
        self.healthcare_professional_name = patch.healthcare_professional_name.clone();
        self.spoken_languages = patch.spoken_languages.clone();
        self.notes = patch.notes.clone();
        self.autofill_place_from_submission_url = patch.autofill_place_from_submission_url;
        self.facility_draft = patch.facility_draft.clone();
        self.healthcare_professional_drafts = patch.healthcare_professional_drafts.clone();
        self.facility_id = patch.facility_id;
        self.healthcare_professional_id = patch.healthcare_professional_id;
        self.updated_date = patch.updated_date;
    }
}

/// Listing filter (status plus limit/offset paging)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl SubmissionFilter {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(status: Option<SubmissionStatus>, limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            status,
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for SubmissionFilter {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

// =============================================================================
// Postgres row mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: SubmissionId,
    status: String,
    google_maps_url: String,
    healthcare_professional_name: String,
    spoken_languages: Vec<String>,
    notes: String,
    autofill_place_from_submission_url: bool,
    facility_draft: Option<Json<FacilityDraft>>,
    healthcare_professional_drafts: Option<Json<Vec<HealthcareProfessionalDraft>>>,
    facility_id: Option<FacilityId>,
    healthcare_professional_id: Option<HealthcareProfessionalId>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = anyhow::Error;

    fn try_from(row: SubmissionRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            status: row.status.parse()?,
            google_maps_url: row.google_maps_url,
            healthcare_professional_name: row.healthcare_professional_name,
            spoken_languages: row.spoken_languages,
            notes: row.notes,
            autofill_place_from_submission_url: row.autofill_place_from_submission_url,
            facility_draft: row.facility_draft.map(|Json(draft)| draft),
            healthcare_professional_drafts: row
                .healthcare_professional_drafts
                .map(|Json(drafts)| drafts),
            facility_id: row.facility_id,
            healthcare_professional_id: row.healthcare_professional_id,
            created_date: row.created_date,
            updated_date: row.updated_date,
        })
    }
}

impl Submission {
    /// Find submission by ID, returning None if not found
    pub async fn find_by_id_optional(id: SubmissionId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Self::try_from).transpose()
    }

    /// Find submissions with optional status filter, newest first
    pub async fn find_with_filters(filter: &SubmissionFilter, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT * FROM submissions
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(Self::try_from).collect()
    }

    /// Insert a new submission; the id is generated here
    pub async fn insert(input: NewSubmission, pool: &PgPool) -> Result<Self> {
        let submission = input.into_submission(SubmissionId::new());
        Self::insert_snapshot(&submission, pool).await?;
        Ok(submission)
    }

    /// Insert a complete row, id included (used to restore a deleted row)
    pub async fn insert_snapshot(submission: &Submission, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, status, google_maps_url, healthcare_professional_name,
                spoken_languages, notes, autofill_place_from_submission_url,
                facility_draft, healthcare_professional_drafts,
                facility_id, healthcare_professional_id,
                created_date, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(submission.id)
        .bind(submission.status.to_string())
        .bind(&submission.google_maps_url)
        .bind(&submission.healthcare_professional_name)
        .bind(&submission.spoken_languages)
        .bind(&submission.notes)
        .bind(submission.autofill_place_from_submission_url)
        .bind(submission.facility_draft.as_ref().map(Json))
        .bind(submission.healthcare_professional_drafts.as_ref().map(Json))
        .bind(submission.facility_id)
        .bind(submission.healthcare_professional_id)
        .bind(submission.created_date)
        .bind(submission.updated_date)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to insert submission {}", submission.id))?;
        Ok(())
    }

    /// Write every mutable column from the patch
    pub async fn apply_patch(id: SubmissionId, patch: &SubmissionPatch, pool: &PgPool) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE submissions SET
                status = $2,
                google_maps_url = $3,
                healthcare_professional_name = $4,
                spoken_languages = $5,
                notes = $6,
                autofill_place_from_submission_url = $7,
                facility_draft = $8,
                healthcare_professional_drafts = $9,
                facility_id = $10,
                healthcare_professional_id = $11,
                updated_date = $12
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.status.to_string())
        .bind(&patch.google_maps_url)
        .bind(&patch.healthcare_professional_name)
        .bind(&patch.spoken_languages)
        .bind(&patch.notes)
        .bind(patch.autofill_place_from_submission_url)
        .bind(patch.facility_draft.as_ref().map(Json))
        .bind(patch.healthcare_professional_drafts.as_ref().map(Json))
        .bind(patch.facility_id)
        .bind(patch.healthcare_professional_id)
        .bind(patch.updated_date)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Submission {} not found for update", id);
        }
        Ok(())
    }

    /// Delete a submission
    pub async fn delete(id: SubmissionId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
