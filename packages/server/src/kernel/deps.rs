//! Server dependencies for the submission lifecycle (using traits for testability)
//!
//! This module provides the central dependency container used by every
//! lifecycle activity. All collaborators are trait objects so tests can swap
//! in the doubles from `test_dependencies`.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::{
    BaseAuditRecorder, BaseFacilityService, BaseHealthcareProfessionalService, BasePlaceLookup,
    BaseSubmissionStore, GooglePlacesClient, NoopPlaceLookup, PgAuditRecorder, PgFacilityService,
    PgHealthcareProfessionalService, PgSubmissionStore,
};

// =============================================================================
// ServerDeps
// =============================================================================

/// Collaborators the lifecycle engine talks to
#[derive(Clone)]
pub struct ServerDeps {
    pub submissions: Arc<dyn BaseSubmissionStore>,
    pub facilities: Arc<dyn BaseFacilityService>,
    pub healthcare_professionals: Arc<dyn BaseHealthcareProfessionalService>,
    pub audit_log: Arc<dyn BaseAuditRecorder>,
    /// External enrichment used by autofill
    pub place_lookup: Arc<dyn BasePlaceLookup>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        submissions: Arc<dyn BaseSubmissionStore>,
        facilities: Arc<dyn BaseFacilityService>,
        healthcare_professionals: Arc<dyn BaseHealthcareProfessionalService>,
        audit_log: Arc<dyn BaseAuditRecorder>,
        place_lookup: Arc<dyn BasePlaceLookup>,
    ) -> Self {
        Self {
            submissions,
            facilities,
            healthcare_professionals,
            audit_log,
            place_lookup,
        }
    }

    /// Production wiring: every store backed by the same Postgres pool.
    ///
    /// Without a Places API key autofill runs against [`NoopPlaceLookup`].
    pub fn postgres(db_pool: PgPool, google_places_api_key: Option<String>) -> Result<Self> {
        let place_lookup: Arc<dyn BasePlaceLookup> = match google_places_api_key {
            Some(key) => Arc::new(GooglePlacesClient::new(key)?),
            None => Arc::new(NoopPlaceLookup),
        };

        Ok(Self::new(
            Arc::new(PgSubmissionStore::new(db_pool.clone())),
            Arc::new(PgFacilityService::new(db_pool.clone())),
            Arc::new(PgHealthcareProfessionalService::new(db_pool.clone())),
            Arc::new(PgAuditRecorder::new(db_pool)),
            place_lookup,
        ))
    }
}
