//! Structured append-only audit trail.
//! One row per changed field, written in the same unit of work as the
//! financial mutation it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Result, Transaction as SqlxTransaction};
use uuid::Uuid;

pub const ENTITY_WALLET: &str = "wallet";
pub const ENTITY_TRANSACTION: &str = "transaction";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub entity_type: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
}

pub async fn record_change(
    executor: &mut SqlxTransaction<'_, Postgres>,
    entity_id: Uuid,
    entity_type: &str,
    field: &str,
    old_value: Option<String>,
    new_value: Option<String>,
    actor: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (
            id, entity_id, entity_type, field, old_value, new_value, actor, recorded_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entity_id)
    .bind(entity_type)
    .bind(field)
    .bind(old_value)
    .bind(new_value)
    .bind(actor)
    .bind(Utc::now())
    .execute(&mut **executor)
    .await?;

    Ok(())
}

pub async fn list_for_entity(
    pool: &PgPool,
    entity_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditRecord>> {
    sqlx::query_as::<_, AuditRecord>(
        r#"
        SELECT id, entity_id, entity_type, field, old_value, new_value, actor, recorded_at
        FROM audit_logs
        WHERE entity_id = $1
        ORDER BY recorded_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(entity_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
