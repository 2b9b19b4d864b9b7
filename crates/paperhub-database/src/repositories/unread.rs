//! PostgreSQL implementation of the unread counter store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_entity::unread::model::UnreadCounter;
use paperhub_entity::unread::store::UnreadStore;

/// PostgreSQL-backed unread counter store.
///
/// `adjust` is a single upsert so concurrent increments on the same
/// folder serialize on the row instead of losing updates.
#[derive(Debug, Clone)]
pub struct PgUnreadStore {
    pool: PgPool,
}

impl PgUnreadStore {
    /// Create a new unread store over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnreadStore for PgUnreadStore {
    async fn get(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT count FROM unread_counters
            WHERE owner_id = $1 AND folder_id = $2
            "#,
        )
        .bind(owner_id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to read unread counter: {e}"), e))?;

        Ok(count.unwrap_or(0))
    }

    async fn map_for_owner(&self, owner_id: Uuid) -> AppResult<HashMap<Uuid, i64>> {
        let rows = sqlx::query_as::<_, UnreadCounter>(
            r#"
            SELECT owner_id, folder_id, count FROM unread_counters
            WHERE owner_id = $1 AND count > 0
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to list unread counters: {e}"), e))?;

        Ok(rows.into_iter().map(|c| (c.folder_id, c.count)).collect())
    }

    async fn adjust(&self, owner_id: Uuid, folder_id: Uuid, delta: i64) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO unread_counters (owner_id, folder_id, count)
            VALUES ($1, $2, GREATEST(0, $3))
            ON CONFLICT (owner_id, folder_id)
            DO UPDATE SET count = GREATEST(0, unread_counters.count + $3)
            RETURNING count
            "#,
        )
        .bind(owner_id)
        .bind(folder_id)
        .bind(delta)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to adjust unread counter: {e}"), e))
    }

    async fn remove(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM unread_counters WHERE owner_id = $1 AND folder_id = $2")
            .bind(owner_id)
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to remove unread counter: {e}"), e))?;

        Ok(())
    }
}
