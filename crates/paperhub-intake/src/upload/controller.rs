//! Upload lifecycle controller.
//!
//! Drives one task through admission, object storage and content
//! analysis, dispatching on the pure state machine in
//! `paperhub_entity::task`. Collaborator failures move the task into
//! its error state and are also returned to the caller; a file record
//! that was already created stays stored and usable.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use paperhub_core::config::ObjectStoreConfig;
use paperhub_core::error::AppError;
use paperhub_core::result::AppResult;
use paperhub_core::traits::analyzer::{AnalysisOutcome, AnalysisRequest, ContentAnalyzer};
use paperhub_core::traits::object_store::ObjectStore;
use paperhub_entity::file::model::CreateFile;
use paperhub_entity::file::store::FileStore;
use paperhub_entity::folder::tree::FolderTreeView;
use paperhub_entity::task::model::UploadTask;
use paperhub_entity::task::state::TaskEvent;
use paperhub_storage::keys::object_key;

use crate::folder::service::FolderService;
use crate::unread::ledger::UnreadLedger;

/// Orchestrates the store and analyze phases of upload tasks.
#[derive(Clone)]
pub struct IntakeController {
    folder_service: FolderService,
    files: Arc<dyn FileStore>,
    objects: Arc<dyn ObjectStore>,
    analyzer: Arc<dyn ContentAnalyzer>,
    ledger: UnreadLedger,
    storage: ObjectStoreConfig,
    locale: String,
}

impl IntakeController {
    /// Create a controller over its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        folder_service: FolderService,
        files: Arc<dyn FileStore>,
        objects: Arc<dyn ObjectStore>,
        analyzer: Arc<dyn ContentAnalyzer>,
        ledger: UnreadLedger,
        storage: ObjectStoreConfig,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            folder_service,
            files,
            objects,
            analyzer,
            ledger,
            storage,
            locale: locale.into(),
        }
    }

    /// The folder service this controller files into.
    pub fn folder_service(&self) -> &FolderService {
        &self.folder_service
    }

    /// Admit one file into the pipeline, validating it before any
    /// collaborator is touched. The returned task is `Queued`.
    pub fn admit(
        &self,
        owner_id: Uuid,
        file_name: &str,
        mime_type: Option<String>,
        size_bytes: i64,
        origin_folder_id: Option<Uuid>,
    ) -> AppResult<UploadTask> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        if size_bytes <= 0 {
            return Err(AppError::validation("File is empty"));
        }
        if size_bytes as u64 > self.storage.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the upload limit of {} bytes",
                self.storage.max_upload_size_bytes
            )));
        }

        Ok(UploadTask::new(
            owner_id,
            file_name,
            mime_type,
            size_bytes,
            origin_folder_id,
        ))
    }

    /// Persist the task's bytes and create its file record
    /// (`Queued → Uploading → Stored`).
    ///
    /// Cancellation is honored up to the moment the file record exists:
    /// a cancelled task leaves neither a record nor an orphaned object
    /// behind. On failure the task moves to its error state and the
    /// error is returned.
    pub async fn store(
        &self,
        task: &mut UploadTask,
        content: Bytes,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        task.advance(TaskEvent::UploadStarted)?;
        match self.store_inner(task, content, cancel).await {
            Ok((file_id, folder_id)) => {
                task.advance(TaskEvent::StoredOk { file_id, folder_id })?;
                info!(
                    owner_id = %task.owner_id,
                    %file_id,
                    %folder_id,
                    file_name = %task.file_name,
                    "File stored"
                );
                Ok(())
            }
            Err(e) => {
                task.fail(&e)?;
                Err(e)
            }
        }
    }

    async fn store_inner(
        &self,
        task: &mut UploadTask,
        content: Bytes,
        cancel: &CancellationToken,
    ) -> AppResult<(Uuid, Uuid)> {
        let owner_id = task.owner_id;

        let target = match task.origin_folder_id {
            Some(folder_id) => {
                let folder = self
                    .folder_service
                    .folders()
                    .find_by_id(folder_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Target folder not found: {folder_id}"))
                    })?;
                if folder.owner_id != owner_id {
                    return Err(AppError::access_denied("Folder belongs to another owner"));
                }
                folder
            }
            None => self.folder_service.ensure_unsorted(owner_id).await?,
        };

        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Upload cancelled"));
        }

        let key = object_key(owner_id, &task.file_name, Utc::now());
        let content_hash = blake3::hash(&content).to_hex().to_string();

        self.objects.put(&key, content).await?;
        task.advance(TaskEvent::UploadProgressed { progress: 100 })?;

        if cancel.is_cancelled() {
            self.remove_object_best_effort(&key).await;
            return Err(AppError::cancelled("Upload cancelled"));
        }

        let data = CreateFile {
            owner_id,
            folder_id: target.id,
            title: task.file_name.clone(),
            storage_path: key.clone(),
            mime_type: task.mime_type.clone(),
            size_bytes: task.size_bytes,
            content_hash: Some(content_hash),
            tags: task.tags.clone(),
            meta: None,
        };
        let file = match self.files.create(&data).await {
            Ok(file) => file,
            Err(e) => {
                self.remove_object_best_effort(&key).await;
                return Err(e);
            }
        };

        // Eager increment: the file counts as unread from the moment it
        // is stored, wherever it currently sits.
        let snapshot = self.folder_service.folders().list_for_owner(owner_id).await?;
        let view = FolderTreeView::new(&snapshot);
        self.ledger.record(owner_id, target.id, &view).await;

        Ok((file.id, target.id))
    }

    async fn remove_object_best_effort(&self, key: &str) {
        if let Err(e) = self.objects.delete(key).await {
            warn!(%key, error = %e, "Failed to remove uploaded object");
        }
    }

    /// Run content analysis for a stored task
    /// (`Stored → Analyzing → AwaitingConfirmation | Stored`).
    ///
    /// `Unsupported` is not a failure: the task returns to `Stored` and
    /// the file stays where it is. Rate-limit and quota outcomes move
    /// the task to its error state while the file record stays intact.
    /// Cancellation also settles the task back to `Stored`; the file is
    /// already safely filed and keeps its location.
    pub async fn analyze(
        &self,
        task: &mut UploadTask,
        content: Option<Bytes>,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        task.advance(TaskEvent::AnalysisStarted)?;

        let owner_id = task.owner_id;

        if cancel.is_cancelled() {
            info!(%owner_id, file_name = %task.file_name, "Analysis cancelled");
            return task.advance(TaskEvent::AnalysisDeclined);
        }

        let snapshot = self.folder_service.folders().list_for_owner(owner_id).await?;
        let view = FolderTreeView::new(&snapshot);
        let existing_paths = leaf_paths(&view);

        let request = AnalysisRequest {
            file_name: task.file_name.clone(),
            mime_type: task.mime_type.clone(),
            content,
            existing_paths,
            locale: self.locale.clone(),
            user_hint: task.user_hint.clone(),
            skip_deep_analysis: task.skip_analysis,
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                info!(%owner_id, file_name = %task.file_name, "Analysis cancelled");
                return task.advance(TaskEvent::AnalysisDeclined);
            }
            outcome = self.analyzer.analyze(&request) => outcome,
        };

        match outcome {
            Ok(AnalysisOutcome::Suggestion(suggestion)) => {
                info!(
                    %owner_id,
                    file_name = %task.file_name,
                    title = %suggestion.suggested_title,
                    path = ?suggestion.suggested_path,
                    "Analyzer suggestion ready"
                );
                task.advance(TaskEvent::SuggestionReady { suggestion })
            }
            Ok(AnalysisOutcome::Unsupported { reason }) => {
                info!(%owner_id, file_name = %task.file_name, %reason, "Analysis declined");
                task.advance(TaskEvent::AnalysisDeclined)
            }
            Ok(AnalysisOutcome::RateLimited) => {
                let e = AppError::rate_limited("Analyzer is rate limited, try again later");
                task.fail(&e)?;
                Err(e)
            }
            Ok(AnalysisOutcome::QuotaExhausted) => {
                let e = AppError::quota_exhausted("Analyzer quota is exhausted");
                task.fail(&e)?;
                Err(e)
            }
            Err(e) => {
                task.fail(&e)?;
                Err(e)
            }
        }
    }
}

/// Render every folder as a `/`-joined path from its root, for the
/// analyzer's reuse list. The unsorted singleton is excluded.
fn leaf_paths(view: &FolderTreeView<'_>) -> Vec<String> {
    let mut paths = Vec::new();
    let mut stack: Vec<(Uuid, String)> = view
        .children_of(None)
        .into_iter()
        .map(|f| (f.id, f.name.clone()))
        .collect();
    while let Some((id, path)) = stack.pop() {
        for child in view.children_of(Some(id)) {
            stack.push((child.id, format!("{path}/{}", child.name)));
        }
        paths.push(path);
    }
    paths.sort();
    paths
}
