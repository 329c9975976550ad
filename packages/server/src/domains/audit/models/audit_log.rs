//! AuditLogEntry model - append-only trail of lifecycle changes
//!
//! Every successful lifecycle transition writes exactly one entry. The write
//! doubles as the commit point of the operation: when it fails, the engine
//! compensates the mutations that preceded it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::common::{AuditLogId, UserId};

/// Version of the old/new value snapshot layout.
pub const AUDIT_SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            _ => Err(anyhow::anyhow!("Invalid audit action: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditObjectType {
    Submission,
    Facility,
    HealthcareProfessional,
}

impl std::fmt::Display for AuditObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditObjectType::Submission => write!(f, "SUBMISSION"),
            AuditObjectType::Facility => write!(f, "FACILITY"),
            AuditObjectType::HealthcareProfessional => write!(f, "HEALTHCARE_PROFESSIONAL"),
        }
    }
}

impl std::str::FromStr for AuditObjectType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SUBMISSION" => Ok(AuditObjectType::Submission),
            "FACILITY" => Ok(AuditObjectType::Facility),
            "HEALTHCARE_PROFESSIONAL" => Ok(AuditObjectType::HealthcareProfessional),
            _ => Err(anyhow::anyhow!("Invalid audit object type: {}", s)),
        }
    }
}

/// A recorded audit entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    pub action: AuditAction,
    pub object_type: AuditObjectType,
    pub actor_id: UserId,
    pub old_value: Option<JsonValue>,
    pub new_value: Option<JsonValue>,
    pub schema_version: i32,
    pub created_at: DateTime<Utc>,
}

/// An entry about to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLogEntry {
    pub action: AuditAction,
    pub object_type: AuditObjectType,
    pub actor_id: UserId,
    pub old_value: Option<JsonValue>,
    pub new_value: Option<JsonValue>,
    pub schema_version: i32,
}

impl NewAuditLogEntry {
    /// Build an entry from typed before/after snapshots.
    pub fn new<T: Serialize>(
        action: AuditAction,
        object_type: AuditObjectType,
        actor_id: UserId,
        old_value: Option<&T>,
        new_value: Option<&T>,
    ) -> Result<Self> {
        Ok(Self {
            action,
            object_type,
            actor_id,
            old_value: old_value.map(serde_json::to_value).transpose()?,
            new_value: new_value.map(serde_json::to_value).transpose()?,
            schema_version: AUDIT_SCHEMA_VERSION,
        })
    }

    pub fn into_entry(self, id: AuditLogId, created_at: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id,
            action: self.action,
            object_type: self.object_type,
            actor_id: self.actor_id,
            old_value: self.old_value,
            new_value: self.new_value,
            schema_version: self.schema_version,
            created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditLogRow {
    id: AuditLogId,
    action: String,
    object_type: String,
    actor_id: UserId,
    old_value: Option<JsonValue>,
    new_value: Option<JsonValue>,
    schema_version: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditLogEntry {
    type Error = anyhow::Error;

    fn try_from(row: AuditLogRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            action: row.action.parse()?,
            object_type: row.object_type.parse()?,
            actor_id: row.actor_id,
            old_value: row.old_value,
            new_value: row.new_value,
            schema_version: row.schema_version,
            created_at: row.created_at,
        })
    }
}

impl AuditLogEntry {
    /// Append an entry
    pub async fn create(entry: NewAuditLogEntry, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, AuditLogRow>(
            r#"
            INSERT INTO audit_logs (
                id, action, object_type, actor_id, old_value, new_value,
                schema_version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(AuditLogId::new())
        .bind(entry.action.to_string())
        .bind(entry.object_type.to_string())
        .bind(entry.actor_id)
        .bind(&entry.old_value)
        .bind(&entry.new_value)
        .bind(entry.schema_version)
        .fetch_one(pool)
        .await?;

        row.try_into()
    }
}
