//! Transient upload task model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;

use super::state::{TaskEvent, TaskState};

/// One file moving through the intake pipeline.
///
/// Tasks live only for the client session: created when a file is
/// selected, destroyed when the user dismisses it or the session ends.
/// A task is never shared across files, and sibling tasks progress
/// independently.
#[derive(Debug, Clone)]
pub struct UploadTask {
    /// Session-local task identifier.
    pub local_id: Uuid,
    /// The uploading owner.
    pub owner_id: Uuid,
    /// Original file name (including extension).
    pub file_name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Tags supplied at upload time.
    pub tags: Vec<String>,
    /// Free-text hint for the analyzer, if any.
    pub user_hint: Option<String>,
    /// When set, the analyzer relies on filename/metadata only.
    pub skip_analysis: bool,
    /// The caller-specified target folder at upload time (`None` means
    /// the owner's unsorted folder).
    pub origin_folder_id: Option<Uuid>,
    /// Current lifecycle state.
    pub state: TaskState,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl UploadTask {
    /// Create a freshly queued task.
    pub fn new(
        owner_id: Uuid,
        file_name: impl Into<String>,
        mime_type: Option<String>,
        size_bytes: i64,
        origin_folder_id: Option<Uuid>,
    ) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            owner_id,
            file_name: file_name.into(),
            mime_type,
            size_bytes,
            tags: Vec::new(),
            user_hint: None,
            skip_analysis: false,
            origin_folder_id,
            state: TaskState::Queued,
            created_at: Utc::now(),
        }
    }

    /// Advance the state machine by one event.
    pub fn advance(&mut self, event: TaskEvent) -> AppResult<()> {
        self.state = self.state.apply(event)?;
        Ok(())
    }

    /// Move the task to its error state, recording the failure verbatim.
    pub fn fail(&mut self, error: &AppError) -> AppResult<()> {
        self.advance(TaskEvent::Failed {
            kind: error.kind,
            message: error.message.clone(),
        })
    }

    /// The file record this task refers to, once one exists.
    pub fn file_id(&self) -> Option<Uuid> {
        self.state.file_id()
    }

    /// The folder the task's file currently sits in, once one exists.
    pub fn folder_id(&self) -> Option<Uuid> {
        self.state.folder_id()
    }

    /// The recorded failure, if the task errored.
    pub fn error(&self) -> Option<(ErrorKind, &str)> {
        match &self.state {
            TaskState::Failed { kind, message } => Some((*kind, message.as_str())),
            _ => None,
        }
    }
}
