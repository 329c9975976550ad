//! Postgres-backed implementations of the collaborator traits.
//!
//! Each adapter is a thin wrapper around a `PgPool` that forwards to the
//! static model methods.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::common::{FacilityId, HealthcareProfessionalId, SubmissionId, UserId};
use crate::domains::audit::{AuditLogEntry, NewAuditLogEntry};
use crate::domains::facilities::{CreateFacility, Facility};
use crate::domains::healthcare_professionals::{
    CreateHealthcareProfessional, HealthcareProfessional,
};
use crate::domains::submissions::models::{
    NewSubmission, Submission, SubmissionFilter, SubmissionPatch,
};
use crate::kernel::{
    BaseAuditRecorder, BaseFacilityService, BaseHealthcareProfessionalService, BaseSubmissionStore,
};

// =============================================================================
// Submissions
// =============================================================================

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseSubmissionStore for PgSubmissionStore {
    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>> {
        Submission::find_by_id_optional(id, &self.pool).await
    }

    async fn insert(&self, submission: NewSubmission) -> Result<Submission> {
        Submission::insert(submission, &self.pool).await
    }

    async fn insert_snapshot(&self, snapshot: &Submission) -> Result<()> {
        Submission::insert_snapshot(snapshot, &self.pool).await
    }

    async fn patch(&self, id: SubmissionId, patch: &SubmissionPatch) -> Result<()> {
        Submission::apply_patch(id, patch, &self.pool).await
    }

    async fn delete(&self, id: SubmissionId) -> Result<()> {
        Submission::delete(id, &self.pool).await
    }

    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        Submission::find_with_filters(filter, &self.pool).await
    }
}

// =============================================================================
// Facilities
// =============================================================================

pub struct PgFacilityService {
    pool: PgPool,
}

impl PgFacilityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseFacilityService for PgFacilityService {
    async fn create(&self, input: CreateFacility, actor: UserId) -> Result<Facility> {
        let facility = Facility::create(input, &self.pool).await?;
        debug!(facility_id = %facility.id, actor_id = %actor, "Facility created");
        Ok(facility)
    }

    async fn delete(&self, id: FacilityId) -> Result<()> {
        Facility::delete(id, &self.pool).await
    }

    async fn find_by_id(&self, id: FacilityId) -> Result<Option<Facility>> {
        Facility::find_by_id_optional(id, &self.pool).await
    }
}

// =============================================================================
// Healthcare professionals
// =============================================================================

pub struct PgHealthcareProfessionalService {
    pool: PgPool,
}

impl PgHealthcareProfessionalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseHealthcareProfessionalService for PgHealthcareProfessionalService {
    async fn create(
        &self,
        input: CreateHealthcareProfessional,
        actor: UserId,
    ) -> Result<HealthcareProfessional> {
        let professional = HealthcareProfessional::create(input, &self.pool).await?;
        debug!(
            healthcare_professional_id = %professional.id,
            actor_id = %actor,
            "Healthcare professional created"
        );
        Ok(professional)
    }

    async fn delete(&self, id: HealthcareProfessionalId) -> Result<()> {
        HealthcareProfessional::delete(id, &self.pool).await
    }

    async fn find_by_id(
        &self,
        id: HealthcareProfessionalId,
    ) -> Result<Option<HealthcareProfessional>> {
        HealthcareProfessional::find_by_id_optional(id, &self.pool).await
    }
}

// =============================================================================
// Audit log
// =============================================================================

pub struct PgAuditRecorder {
    pool: PgPool,
}

impl PgAuditRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAuditRecorder for PgAuditRecorder {
    async fn record(&self, entry: NewAuditLogEntry) -> Result<()> {
        AuditLogEntry::create(entry, &self.pool).await?;
        Ok(())
    }
}
