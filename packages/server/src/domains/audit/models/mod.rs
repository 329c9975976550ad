pub mod audit_log;

pub use audit_log::{
    AuditAction, AuditLogEntry, AuditObjectType, NewAuditLogEntry, AUDIT_SCHEMA_VERSION,
};
