//! Typed ID aliases for every entity the directory persists.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Submission entities (candidate listings awaiting review).
pub struct Submission;

/// Marker type for Facility entities (published directory facilities).
pub struct Facility;

/// Marker type for HealthcareProfessional entities.
pub struct HealthcareProfessional;

/// Marker type for AuditLogEntry entities.
pub struct AuditLogEntry;

/// Marker type for the acting user recorded on audit entries.
pub struct User;

// ============================================================================
// Type aliases
// ============================================================================

pub type SubmissionId = Id<Submission>;

pub type FacilityId = Id<Facility>;

pub type HealthcareProfessionalId = Id<HealthcareProfessional>;

pub type AuditLogId = Id<AuditLogEntry>;

/// Identity of whoever performed a lifecycle call. `UserId::nil()` is the
/// anonymous contributor.
pub type UserId = Id<User>;
