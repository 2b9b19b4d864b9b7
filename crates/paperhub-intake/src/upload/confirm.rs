//! Human-in-the-loop confirmation of analyzer suggestions.
//!
//! The suggestion surfaces as an editable draft. Accepting resolves the
//! (possibly edited) path against a fresh folder snapshot, updates the
//! file record and moves its unread contribution if the folder changed.
//! Cancelling keeps the file exactly where the store phase put it.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use paperhub_core::error::AppError;
use paperhub_core::result::AppResult;
use paperhub_core::traits::analyzer::DocumentSuggestion;
use paperhub_entity::file::model::File;
use paperhub_entity::file::provenance::FileProvenance;
use paperhub_entity::file::store::FileStore;
use paperhub_entity::folder::store::FolderStore;
use paperhub_entity::folder::tree::FolderTreeView;
use paperhub_entity::task::model::UploadTask;
use paperhub_entity::task::state::{TaskEvent, TaskState};

use crate::folder::resolver::PathResolver;
use crate::unread::ledger::UnreadLedger;

/// An editable copy of the analyzer's proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationDraft {
    /// Target path segments, root-first.
    pub segments: Vec<String>,
    /// Proposed title.
    pub title: String,
    /// Proposed tags.
    pub tags: Vec<String>,
}

impl ConfirmationDraft {
    /// Seed the draft from a suggestion, falling back to the original
    /// file name when the analyzer proposed no title.
    pub fn from_suggestion(suggestion: &DocumentSuggestion, fallback_title: &str) -> Self {
        let title = if suggestion.suggested_title.trim().is_empty() {
            fallback_title.to_string()
        } else {
            suggestion.suggested_title.clone()
        };
        Self {
            segments: suggestion.suggested_path.clone(),
            title,
            tags: suggestion.keywords.clone(),
        }
    }

    /// Replace one path segment. An empty value removes the segment.
    pub fn edit_segment(&mut self, index: usize, value: &str) {
        if index >= self.segments.len() {
            return;
        }
        let value = value.trim();
        if value.is_empty() {
            self.segments.remove(index);
        } else {
            self.segments[index] = value.to_string();
        }
    }

    /// Append a path segment.
    pub fn push_segment(&mut self, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.segments.push(value.to_string());
        }
    }
}

/// The result of a successful commit.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// The updated file record.
    pub file: File,
    /// The folder the file was filed into.
    pub folder_id: Uuid,
    /// Folders the path resolution created.
    pub created_folders: Vec<Uuid>,
    /// Whether the path was truncated to honor the depth limit.
    pub truncated: bool,
}

/// Applies or discards a pending suggestion.
#[derive(Clone)]
pub struct ConfirmationWorkflow {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    resolver: PathResolver,
    ledger: UnreadLedger,
}

impl ConfirmationWorkflow {
    /// Create a workflow over its collaborators.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        resolver: PathResolver,
        ledger: UnreadLedger,
    ) -> Self {
        Self {
            folders,
            files,
            resolver,
            ledger,
        }
    }

    /// Commit the draft: resolve the path, update the file record and
    /// reconcile unread counts (`AwaitingConfirmation → Committed`).
    ///
    /// Validation failures (an emptied-out path) leave the task awaiting
    /// confirmation so the user can fix the draft and retry.
    pub async fn accept(
        &self,
        task: &mut UploadTask,
        draft: &ConfirmationDraft,
    ) -> AppResult<CommitReceipt> {
        let (file_id, current_folder_id, suggestion) = match &task.state {
            TaskState::AwaitingConfirmation {
                file_id,
                folder_id,
                suggestion,
            } => (*file_id, *folder_id, suggestion.clone()),
            other => {
                return Err(AppError::conflict(format!(
                    "Task is not awaiting confirmation (state: {})",
                    other.name()
                )));
            }
        };
        let owner_id = task.owner_id;

        // Resolve against the folders as they exist now, not as they
        // existed when the suggestion was produced.
        let snapshot = self.folders.list_for_owner(owner_id).await?;
        let resolution = self
            .resolver
            .resolve(owner_id, &draft.segments, &snapshot)
            .await?;

        let mut file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File not found: {file_id}")))?;

        let title = draft.title.trim();
        file.folder_id = resolution.folder_id;
        if !title.is_empty() {
            file.title = title.to_string();
        }
        for tag in &draft.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !file.tags.iter().any(|t| t == tag) {
                file.tags.push(tag.to_string());
            }
        }
        file.meta = Some(
            FileProvenance::from_suggestion(&suggestion).merged_into(file.meta.take()),
        );

        let file = self.files.update(&file).await?;

        if resolution.folder_id != current_folder_id {
            // Re-fetch so folders created during resolution have their
            // ancestry available for the counter transfer.
            let snapshot = self.folders.list_for_owner(owner_id).await?;
            let view = FolderTreeView::new(&snapshot);
            self.ledger
                .transfer(owner_id, current_folder_id, resolution.folder_id, &view)
                .await;
        }

        task.advance(TaskEvent::CommitApplied {
            folder_id: resolution.folder_id,
        })?;

        info!(
            %owner_id,
            %file_id,
            folder_id = %resolution.folder_id,
            created = resolution.created.len(),
            truncated = resolution.truncated,
            "Suggestion committed"
        );

        Ok(CommitReceipt {
            file,
            folder_id: resolution.folder_id,
            created_folders: resolution.created,
            truncated: resolution.truncated,
        })
    }

    /// Discard the suggestion; the file stays where the store phase put
    /// it (`AwaitingConfirmation → Stored`).
    pub fn cancel(&self, task: &mut UploadTask) -> AppResult<()> {
        task.advance(TaskEvent::ConfirmationCancelled)?;
        info!(owner_id = %task.owner_id, file_name = %task.file_name, "Confirmation cancelled");
        Ok(())
    }
}
