//! PostgreSQL implementation of the file store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_entity::file::model::{CreateFile, File};
use paperhub_entity::file::store::FileStore;

/// PostgreSQL-backed file store.
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Create a new file store over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FILE_COLUMNS: &str = "id, owner_id, folder_id, title, storage_path, mime_type, \
     size_bytes, content_hash, tags, meta, created_at, updated_at";

#[async_trait]
impl FileStore for PgFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to find file: {e}"), e))
    }

    async fn list_by_folder(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files \
             WHERE owner_id = $1 AND folder_id = $2 \
             ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to list files: {e}"), e))
    }

    async fn count_by_folder(&self, owner_id: Uuid) -> AppResult<HashMap<Uuid, u64>> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT folder_id, COUNT(*)
            FROM files
            WHERE owner_id = $1
            GROUP BY folder_id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to count files: {e}"), e))?;

        Ok(rows
            .into_iter()
            .map(|(folder_id, count)| (folder_id, count as u64))
            .collect())
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(&format!(
            "INSERT INTO files \
             (owner_id, folder_id, title, storage_path, mime_type, size_bytes, content_hash, tags, meta) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {FILE_COLUMNS}"
        ))
        .bind(data.owner_id)
        .bind(data.folder_id)
        .bind(&data.title)
        .bind(&data.storage_path)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(&data.content_hash)
        .bind(&data.tags)
        .bind(&data.meta)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to create file: {e}"), e))
    }

    async fn update(&self, file: &File) -> AppResult<File> {
        sqlx::query_as::<_, File>(&format!(
            "UPDATE files \
             SET folder_id = $2, title = $3, tags = $4, meta = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {FILE_COLUMNS}"
        ))
        .bind(file.id)
        .bind(file.folder_id)
        .bind(&file.title)
        .bind(&file.tags)
        .bind(&file.meta)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to update file: {e}"), e))?
        .ok_or_else(|| AppError::not_found(format!("File not found: {}", file.id)))
    }

    async fn reassign_folder(
        &self,
        owner_id: Uuid,
        from_folder_id: Uuid,
        to_folder_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE files
            SET folder_id = $3, updated_at = NOW()
            WHERE owner_id = $1 AND folder_id = $2
            "#,
        )
        .bind(owner_id)
        .bind(from_folder_id)
        .bind(to_folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to reassign files: {e}"), e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to delete file: {e}"), e))?;

        Ok(result.rows_affected() > 0)
    }
}
