// Trait definitions for dependency injection
//
// These are the collaborators the submission lifecycle engine talks to. They
// are INFRASTRUCTURE traits only - dumb CRUD and enrichment primitives. Every
// invariant of the lifecycle lives in domains/submissions.
//
// Naming convention: Base* for trait names (e.g., BaseAuditRecorder)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{FacilityId, HealthcareProfessionalId, SubmissionId, UserId};
use crate::domains::audit::NewAuditLogEntry;
use crate::domains::facilities::{CreateFacility, Facility};
use crate::domains::healthcare_professionals::{
    CreateHealthcareProfessional, HealthcareProfessional,
};
use crate::domains::submissions::models::{
    NewSubmission, Submission, SubmissionFilter, SubmissionPatch,
};

// =============================================================================
// Submission Store (Repository access)
// =============================================================================

#[async_trait]
pub trait BaseSubmissionStore: Send + Sync {
    /// Point read. `Ok(None)` when the row does not exist.
    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>>;

    /// Insert a new row; the store assigns the id.
    async fn insert(&self, submission: NewSubmission) -> Result<Submission>;

    /// Insert a complete row verbatim, id included.
    async fn insert_snapshot(&self, snapshot: &Submission) -> Result<()>;

    /// Overwrite the mutable columns of an existing row.
    async fn patch(&self, id: SubmissionId, patch: &SubmissionPatch) -> Result<()>;

    async fn delete(&self, id: SubmissionId) -> Result<()>;

    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>>;
}

// =============================================================================
// Facility / HealthcareProfessional creators
// =============================================================================

#[async_trait]
pub trait BaseFacilityService: Send + Sync {
    async fn create(&self, input: CreateFacility, actor: UserId) -> Result<Facility>;

    /// Only used to compensate a create.
    async fn delete(&self, id: FacilityId) -> Result<()>;

    async fn find_by_id(&self, id: FacilityId) -> Result<Option<Facility>>;
}

#[async_trait]
pub trait BaseHealthcareProfessionalService: Send + Sync {
    async fn create(
        &self,
        input: CreateHealthcareProfessional,
        actor: UserId,
    ) -> Result<HealthcareProfessional>;

    /// Only used to compensate a create.
    async fn delete(&self, id: HealthcareProfessionalId) -> Result<()>;

    async fn find_by_id(&self, id: HealthcareProfessionalId)
        -> Result<Option<HealthcareProfessional>>;
}

// =============================================================================
// Audit Recorder
// =============================================================================

#[async_trait]
pub trait BaseAuditRecorder: Send + Sync {
    /// Append one entry. Any error is treated as a failed commit.
    async fn record(&self, entry: NewAuditLogEntry) -> Result<()>;
}

// =============================================================================
// Place Lookup (external enrichment)
// =============================================================================

/// Whatever a place lookup could find out about a maps URL. Every field is
/// optional; missing ones stay missing in the facility draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub name_en: Option<String>,
    pub name_ja: Option<String>,
    pub postal_code: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Canonical maps URL of the place
    pub google_maps_url: Option<String>,
}

#[async_trait]
pub trait BasePlaceLookup: Send + Sync {
    /// `Ok(None)` means the URL could not be enriched.
    async fn lookup(&self, google_maps_url: &str) -> Result<Option<PlaceDetails>>;
}
