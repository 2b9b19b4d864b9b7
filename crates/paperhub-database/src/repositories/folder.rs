//! PostgreSQL implementation of the folder store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_entity::folder::model::{CreateFolder, Folder, UNSORTED_META_TYPE};
use paperhub_entity::folder::store::FolderStore;

/// PostgreSQL-backed folder store.
#[derive(Debug, Clone)]
pub struct PgFolderStore {
    pool: PgPool,
}

impl PgFolderStore {
    /// Create a new folder store over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error to an application error, turning unique-constraint
/// violations into `Conflict` so the path resolver can retry.
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::conflict("A folder with this name already exists here");
        }
    }
    AppError::with_source(ErrorKind::Database, format!("{context}: {e}"), e)
}

#[async_trait]
impl FolderStore for PgFolderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            r#"
            SELECT id, owner_id, parent_id, name, meta, created_at, updated_at
            FROM folders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to find folder: {e}"), e))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            r#"
            SELECT id, owner_id, parent_id, name, meta, created_at, updated_at
            FROM folders
            WHERE owner_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to list folders: {e}"), e))
    }

    async fn find_child_by_name(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        // The unsorted singleton never participates in name matching.
        sqlx::query_as::<_, Folder>(
            r#"
            SELECT id, owner_id, parent_id, name, meta, created_at, updated_at
            FROM folders
            WHERE owner_id = $1
              AND parent_id IS NOT DISTINCT FROM $2
              AND name = $3
              AND (meta ->> 'type') IS DISTINCT FROM $4
            "#,
        )
        .bind(owner_id)
        .bind(parent_id)
        .bind(name)
        .bind(UNSORTED_META_TYPE)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to find child folder: {e}"), e))
    }

    async fn find_unsorted(&self, owner_id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            r#"
            SELECT id, owner_id, parent_id, name, meta, created_at, updated_at
            FROM folders
            WHERE owner_id = $1
              AND (meta ->> 'type') = $2
            "#,
        )
        .bind(owner_id)
        .bind(UNSORTED_META_TYPE)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to find unsorted folder: {e}"), e))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            r#"
            INSERT INTO folders (owner_id, parent_id, name, meta)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, parent_id, name, meta, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.meta)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create folder"))
    }

    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            r#"
            UPDATE folders
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, parent_id, name, meta, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to rename folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))
    }

    async fn set_parent(&self, id: Uuid, new_parent_id: Option<Uuid>) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            r#"
            UPDATE folders
            SET parent_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, parent_id, name, meta, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(new_parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to move folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to delete folder: {e}"), e))?;

        Ok(result.rows_affected() > 0)
    }
}
