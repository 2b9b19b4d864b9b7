//! Folder management service.
//!
//! Owns the hierarchy invariants: nesting never exceeds
//! [`MAX_FOLDER_DEPTH`] levels, re-parenting never forms a cycle, and
//! the per-owner unsorted singleton exists exactly once and stays out
//! of every user-facing rule.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use paperhub_core::config::IntakeConfig;
use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_entity::file::store::FileStore;
use paperhub_entity::folder::model::{CreateFolder, Folder, MAX_FOLDER_DEPTH};
use paperhub_entity::folder::store::FolderStore;
use paperhub_entity::folder::tree::{FolderNode, FolderTreeView};

use crate::unread::ledger::UnreadLedger;

/// Service for folder hierarchy operations.
#[derive(Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    ledger: UnreadLedger,
    config: IntakeConfig,
}

impl FolderService {
    /// Create a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        ledger: UnreadLedger,
        config: IntakeConfig,
    ) -> Self {
        Self {
            folders,
            files,
            ledger,
            config,
        }
    }

    /// The underlying folder store.
    pub fn folders(&self) -> &Arc<dyn FolderStore> {
        &self.folders
    }

    /// Fetch a folder, verifying it belongs to `owner_id`.
    async fn fetch_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))?;
        if folder.owner_id != owner_id {
            return Err(AppError::access_denied("Folder belongs to another owner"));
        }
        Ok(folder)
    }

    /// Create a folder under `parent_id` (root level when `None`).
    pub async fn create(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }

        if let Some(parent_id) = parent_id {
            let parent = self.fetch_owned(owner_id, parent_id).await?;
            if parent.is_unsorted() {
                return Err(AppError::validation(
                    "Cannot create folders inside the unsorted folder",
                ));
            }
            let snapshot = self.folders.list_for_owner(owner_id).await?;
            let view = FolderTreeView::new(&snapshot);
            let parent_level = view
                .depth_of(parent_id)
                .unwrap_or(0)
                + 1;
            if parent_level >= MAX_FOLDER_DEPTH {
                return Err(AppError::depth_exceeded(format!(
                    "Folders cannot nest deeper than {MAX_FOLDER_DEPTH} levels"
                )));
            }
        }

        let folder = self
            .folders
            .create(&CreateFolder::user(owner_id, parent_id, name))
            .await?;
        info!(%owner_id, folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Rename a folder.
    pub async fn rename(&self, owner_id: Uuid, id: Uuid, new_name: &str) -> AppResult<Folder> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }

        let folder = self.fetch_owned(owner_id, id).await?;
        if folder.is_unsorted() {
            return Err(AppError::validation("The unsorted folder cannot be renamed"));
        }

        let renamed = self.folders.rename(id, new_name).await?;
        info!(%owner_id, folder_id = %id, name = %new_name, "Folder renamed");
        Ok(renamed)
    }

    /// Re-parent a folder (`None` moves it to the root level).
    ///
    /// Rejects moves that would form a cycle or push any folder of the
    /// moved subtree past the nesting limit.
    pub async fn move_folder(
        &self,
        owner_id: Uuid,
        id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let folder = self.fetch_owned(owner_id, id).await?;
        if folder.is_unsorted() {
            return Err(AppError::validation("The unsorted folder cannot be moved"));
        }
        if folder.parent_id == new_parent_id {
            return Ok(folder);
        }

        let snapshot = self.folders.list_for_owner(owner_id).await?;
        let view = FolderTreeView::new(&snapshot);

        let new_parent_level = match new_parent_id {
            Some(parent_id) => {
                if parent_id == id {
                    return Err(AppError::cycle_detected(
                        "A folder cannot be moved into itself",
                    ));
                }
                let parent = self.fetch_owned(owner_id, parent_id).await?;
                if parent.is_unsorted() {
                    return Err(AppError::validation(
                        "Cannot move folders into the unsorted folder",
                    ));
                }
                if view.is_descendant_of(parent_id, id) {
                    return Err(AppError::cycle_detected(
                        "A folder cannot be moved into its own subtree",
                    ));
                }
                view.depth_of(parent_id).unwrap_or(0) + 1
            }
            None => 0,
        };

        // The deepest descendant must still fit under the nesting limit.
        let deepest_level = new_parent_level + 1 + view.height_of(id);
        if deepest_level > MAX_FOLDER_DEPTH {
            return Err(AppError::depth_exceeded(format!(
                "Moving here would nest folders deeper than {MAX_FOLDER_DEPTH} levels"
            )));
        }

        let old_ancestors = view.ancestors_of(id);
        let moved = self.folders.set_parent(id, new_parent_id).await?;
        let new_ancestors = match new_parent_id {
            Some(parent_id) => {
                let mut chain = vec![parent_id];
                chain.extend(view.ancestors_of(parent_id));
                chain
            }
            None => Vec::new(),
        };
        self.ledger
            .reparent(owner_id, id, &old_ancestors, &new_ancestors)
            .await?;

        info!(%owner_id, folder_id = %id, new_parent = ?new_parent_id, "Folder moved");
        Ok(moved)
    }

    /// Delete a folder and its subtree. Files anywhere in the subtree
    /// are reassigned to the owner's unsorted folder; their unread
    /// contribution follows them there. Returns the number of files
    /// reassigned.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<u64> {
        let folder = self.fetch_owned(owner_id, id).await?;
        if folder.is_unsorted() {
            return Err(AppError::validation(
                "The unsorted folder cannot be deleted",
            ));
        }

        let unsorted = self.ensure_unsorted(owner_id).await?;
        let snapshot = self.folders.list_for_owner(owner_id).await?;
        let view = FolderTreeView::new(&snapshot);

        // Subtree in leaf-first order, so no folder is deleted before
        // its children.
        let mut subtree = view.descendants_of(id);
        subtree.push(id);
        subtree.sort_by_key(|f| std::cmp::Reverse(view.depth_of(*f).unwrap_or(0)));

        let mut reassigned = 0;
        for folder_id in &subtree {
            reassigned += self
                .files
                .reassign_folder(owner_id, *folder_id, unsorted.id)
                .await?;
        }

        // The subtree's cumulative count leaves the old ancestor chain
        // and lands on the unsorted folder.
        let amount = self.ledger.counters().get(owner_id, id).await?;
        if amount > 0 {
            self.ledger.counters().adjust(owner_id, unsorted.id, amount).await?;
            for ancestor in view.ancestors_of(id) {
                self.ledger.counters().adjust(owner_id, ancestor, -amount).await?;
            }
        }

        for folder_id in &subtree {
            self.ledger.counters().remove(owner_id, *folder_id).await?;
            self.folders.delete(*folder_id).await?;
        }

        info!(
            %owner_id,
            folder_id = %id,
            folders_deleted = subtree.len(),
            files_reassigned = reassigned,
            "Folder deleted"
        );
        Ok(reassigned)
    }

    /// Render the owner's folder forest with unread and file-count
    /// badges. The unsorted singleton is excluded.
    pub async fn list_tree(&self, owner_id: Uuid) -> AppResult<Vec<FolderNode>> {
        let snapshot = self.folders.list_for_owner(owner_id).await?;
        let view = FolderTreeView::new(&snapshot);
        let unread = self.ledger.counters().map_for_owner(owner_id).await?;
        let file_counts = self.files.count_by_folder(owner_id).await?;
        Ok(FolderNode::build_forest(&view, &unread, &file_counts))
    }

    /// Return the owner's unsorted singleton, creating it on first use.
    pub async fn ensure_unsorted(&self, owner_id: Uuid) -> AppResult<Folder> {
        if let Some(unsorted) = self.folders.find_unsorted(owner_id).await? {
            return Ok(unsorted);
        }

        let data = CreateFolder::unsorted(owner_id, &self.config.unsorted_folder_name);
        match self.folders.create(&data).await {
            Ok(folder) => {
                info!(%owner_id, folder_id = %folder.id, "Unsorted folder created");
                Ok(folder)
            }
            // Lost a creation race; the winner's row is there now.
            Err(e) if e.kind == ErrorKind::Conflict => self
                .folders
                .find_unsorted(owner_id)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// Mark a folder as visited, clearing its direct unread
    /// contribution. Returns the amount cleared.
    pub async fn visit(&self, owner_id: Uuid, id: Uuid) -> AppResult<i64> {
        self.fetch_owned(owner_id, id).await?;
        let snapshot = self.folders.list_for_owner(owner_id).await?;
        let view = FolderTreeView::new(&snapshot);
        let counts = self.ledger.counters().map_for_owner(owner_id).await?;
        let cleared = self.ledger.mark_visited(owner_id, id, &view, &counts).await?;
        if cleared > 0 {
            info!(%owner_id, folder_id = %id, cleared, "Folder visited");
        }
        Ok(cleared)
    }
}
