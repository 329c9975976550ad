//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod places_client;
pub mod postgres_adapters;
pub mod saga;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use places_client::{query_from_maps_url, GooglePlacesClient, NoopPlaceLookup};
pub use postgres_adapters::{
    PgAuditRecorder, PgFacilityService, PgHealthcareProfessionalService, PgSubmissionStore,
};
pub use saga::{CompensationReport, Compensations};
pub use test_dependencies::{
    InMemorySubmissionStore, MockAuditRecorder, MockFacilityService,
    MockHealthcareProfessionalService, MockPlaceLookup, TestDependencies,
};
pub use traits::*;
