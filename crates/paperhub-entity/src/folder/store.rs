//! Store contract for folder records.

use async_trait::async_trait;
use uuid::Uuid;

use paperhub_core::result::AppResult;

use super::model::{CreateFolder, Folder};

/// Relational store contract for folders.
///
/// Implemented by `paperhub-database` against PostgreSQL; tests use an
/// in-memory double. Invariant enforcement (depth, cycles, ownership)
/// lives in the folder service, not here — except sibling-name
/// uniqueness, which the backing store must report as a `Conflict` so
/// the path resolver can retry its lookup.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// All folders belonging to an owner (flat; callers rebuild the tree).
    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Find a direct child by exact name under the given parent.
    async fn find_child_by_name(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>>;

    /// Find the owner's unsorted singleton, if it exists.
    async fn find_unsorted(&self, owner_id: Uuid) -> AppResult<Option<Folder>>;

    /// Create a new folder. Fails with `Conflict` when a sibling with the
    /// same name already exists.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename a folder.
    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<Folder>;

    /// Re-parent a folder (`None` moves it to the root level).
    async fn set_parent(&self, id: Uuid, new_parent_id: Option<Uuid>) -> AppResult<Folder>;

    /// Delete a folder row. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
