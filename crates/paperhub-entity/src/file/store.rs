//! Store contract for file records.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use paperhub_core::result::AppResult;

use super::model::{CreateFile, File};

/// Relational store contract for files.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Find a file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// List files directly contained in a folder.
    async fn list_by_folder(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<Vec<File>>;

    /// Per-folder direct file counts for an owner (folders with zero
    /// files are absent).
    async fn count_by_folder(&self, owner_id: Uuid) -> AppResult<HashMap<Uuid, u64>>;

    /// Create a new file record.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Persist an updated file record (folder, title, tags, meta).
    async fn update(&self, file: &File) -> AppResult<File>;

    /// Move every file from one folder to another. Returns the number of
    /// files moved. Used by the folder-delete cascade.
    async fn reassign_folder(
        &self,
        owner_id: Uuid,
        from_folder_id: Uuid,
        to_folder_id: Uuid,
    ) -> AppResult<u64>;

    /// Delete a file record. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
