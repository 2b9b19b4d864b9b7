//! Sequential batch uploads.
//!
//! Tasks run strictly one at a time with a small delay between them,
//! and one task's failure never aborts its siblings. [`run_batch`]
//! stores files as-is; [`run_smart_batch`] additionally drives each
//! stored task through content analysis, where the inter-task delay
//! keeps the analyzer from being hammered.

use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use paperhub_core::error::AppError;
use paperhub_entity::task::model::UploadTask;
use paperhub_entity::task::state::TaskState;

use super::controller::IntakeController;

/// One file in a batch upload.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Original file name (including extension).
    pub file_name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// The file's bytes.
    pub content: Bytes,
    /// Tags supplied at upload time.
    pub tags: Vec<String>,
    /// Free-text hint for the analyzer, if any.
    pub user_hint: Option<String>,
    /// When set, the analyzer relies on filename/metadata only.
    pub skip_analysis: bool,
}

impl BatchItem {
    /// A plain item carrying only the file identity and bytes.
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            content,
            tags: Vec::new(),
            user_hint: None,
            skip_analysis: false,
        }
    }
}

/// What happened to each batch item.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Tasks that entered the pipeline (stored or failed within it).
    pub tasks: Vec<UploadTask>,
    /// Items rejected at admission, or skipped after cancellation.
    pub rejected: Vec<(String, AppError)>,
}

impl BatchReport {
    /// Number of tasks that reached their stored state.
    pub fn stored(&self) -> usize {
        self.tasks.iter().filter(|t| t.error().is_none()).count()
    }

    /// Number of items that failed or were rejected.
    pub fn failed(&self) -> usize {
        self.tasks.iter().filter(|t| t.error().is_some()).count() + self.rejected.len()
    }

    /// Number of tasks holding a suggestion that awaits confirmation.
    pub fn awaiting_confirmation(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.state, TaskState::AwaitingConfirmation { .. }))
            .count()
    }
}

/// Upload a batch of files sequentially into `origin_folder_id` (the
/// owner's unsorted folder when `None`), pausing `delay` between items.
pub async fn run_batch(
    controller: &IntakeController,
    owner_id: Uuid,
    origin_folder_id: Option<Uuid>,
    items: Vec<BatchItem>,
    delay: Duration,
    cancel: &CancellationToken,
) -> BatchReport {
    run_items(controller, owner_id, origin_folder_id, items, delay, cancel, false).await
}

/// Smart Upload across a batch: store each file, then run content
/// analysis on it, sequentially with `delay` between items so the
/// analyzer is never hit in a burst. Each resulting task settles in
/// awaiting-confirmation, stored (analysis declined) or its error
/// state, independently of its siblings.
pub async fn run_smart_batch(
    controller: &IntakeController,
    owner_id: Uuid,
    origin_folder_id: Option<Uuid>,
    items: Vec<BatchItem>,
    delay: Duration,
    cancel: &CancellationToken,
) -> BatchReport {
    run_items(controller, owner_id, origin_folder_id, items, delay, cancel, true).await
}

#[allow(clippy::too_many_arguments)]
async fn run_items(
    controller: &IntakeController,
    owner_id: Uuid,
    origin_folder_id: Option<Uuid>,
    items: Vec<BatchItem>,
    delay: Duration,
    cancel: &CancellationToken,
    analyze: bool,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut first = true;

    for item in items {
        if cancel.is_cancelled() {
            report
                .rejected
                .push((item.file_name, AppError::cancelled("Batch cancelled")));
            continue;
        }
        if !first && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        first = false;

        let mut task = match controller.admit(
            owner_id,
            &item.file_name,
            item.mime_type.clone(),
            item.content.len() as i64,
            origin_folder_id,
        ) {
            Ok(task) => task,
            Err(e) => {
                warn!(file_name = %item.file_name, error = %e, "Batch item rejected");
                report.rejected.push((item.file_name, e));
                continue;
            }
        };
        task.tags = item.tags.clone();
        task.user_hint = item.user_hint.clone();
        task.skip_analysis = item.skip_analysis;

        let body = item.content.clone();
        if let Err(e) = controller.store(&mut task, item.content, cancel).await {
            warn!(file_name = %task.file_name, error = %e, "Batch item failed");
            report.tasks.push(task);
            continue;
        }

        if analyze {
            let content = if task.skip_analysis { None } else { Some(body) };
            if let Err(e) = controller.analyze(&mut task, content, cancel).await {
                warn!(file_name = %task.file_name, error = %e, "Batch item analysis failed");
            }
        }
        report.tasks.push(task);
    }

    report
}
