//! Audit domain - append-only record of who changed what

pub mod models;

pub use models::{AuditAction, AuditLogEntry, AuditObjectType, NewAuditLogEntry};
