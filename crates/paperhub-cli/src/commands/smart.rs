//! Smart Upload: store one or more files, analyze each and confirm the
//! proposed filing locations interactively.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use clap::Args;
use dialoguer::{Input, Select};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use paperhub_core::error::AppError;
use paperhub_core::traits::analyzer::DocumentSuggestion;
use paperhub_entity::task::model::UploadTask;
use paperhub_entity::task::state::TaskState;
use paperhub_intake::upload::batch::{run_smart_batch, BatchItem};
use paperhub_intake::upload::confirm::ConfirmationDraft;

use crate::commands::AppContext;
use crate::output;

/// Arguments for the smart command
#[derive(Debug, Args)]
pub struct SmartArgs {
    /// Owner ID the files belong to
    #[arg(short, long)]
    pub owner: Uuid,

    /// The files to upload and analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Free-text hint for the analyzer
    #[arg(long)]
    pub hint: Option<String>,

    /// Tags to attach to the files
    #[arg(short, long)]
    pub tags: Vec<String>,

    /// Skip content inspection; analyze filename and metadata only
    #[arg(long)]
    pub skip_deep: bool,
}

/// Execute the smart command
pub async fn execute(args: &SmartArgs, env: &str) -> Result<(), AppError> {
    let ctx = super::build_context(env).await?;
    let cancel = CancellationToken::new();

    let mut items = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| AppError::validation(format!("Invalid file path: {}", path.display())))?;
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        let mut item = BatchItem::new(file_name, mime_type, Bytes::from(content));
        item.tags = args.tags.clone();
        item.user_hint = args.hint.clone();
        item.skip_analysis = args.skip_deep;
        items.push(item);
    }

    let delay = Duration::from_millis(ctx.config.intake.batch_delay_ms);
    let report = run_smart_batch(&ctx.controller, args.owner, None, items, delay, &cancel).await;

    for (file_name, error) in &report.rejected {
        output::print_warning(&format!("{} rejected: {}", file_name, error));
    }

    for mut task in report.tasks {
        match &task.state {
            TaskState::AwaitingConfirmation { .. } => confirm_task(&ctx, &mut task).await?,
            TaskState::Stored { .. } => {
                println!(
                    "{}: no suggestion available; the file stays in the unsorted folder.",
                    task.file_name
                );
            }
            _ => {
                if let Some((kind, message)) = task.error() {
                    output::print_warning(&format!(
                        "{} failed: {} ({})",
                        task.file_name, message, kind
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Interactive confirmation loop for one task holding a suggestion.
async fn confirm_task(ctx: &AppContext, task: &mut UploadTask) -> Result<(), AppError> {
    let suggestion = match &task.state {
        TaskState::AwaitingConfirmation { suggestion, .. } => suggestion.clone(),
        _ => return Ok(()),
    };

    let mut draft = ConfirmationDraft::from_suggestion(&suggestion, &task.file_name);
    print_proposal(&task.file_name, &suggestion, &draft);

    loop {
        let choice = Select::new()
            .with_prompt("Apply this suggestion?")
            .items(&["Accept", "Edit path", "Edit title", "Edit tags", "Cancel"])
            .default(0)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        match choice {
            0 => match ctx.workflow.accept(task, &draft).await {
                Ok(receipt) => {
                    if receipt.truncated {
                        output::print_warning(
                            "The path was shortened to honor the folder nesting limit.",
                        );
                    }
                    output::print_success(&format!(
                        "Filed as '{}' ({} new folder(s) created).",
                        receipt.file.title,
                        receipt.created_folders.len()
                    ));
                    return Ok(());
                }
                Err(e) if e.kind == paperhub_core::error::ErrorKind::Validation => {
                    output::print_warning(&format!("{}. Edit the path and retry.", e.message));
                }
                Err(e) => return Err(e),
            },
            1 => {
                let current = draft.segments.join("/");
                let edited: String = Input::new()
                    .with_prompt("Path (segments separated by /)")
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                draft.segments = edited
                    .split('/')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            2 => {
                let edited: String = Input::new()
                    .with_prompt("Title")
                    .with_initial_text(draft.title.clone())
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                draft.title = edited;
            }
            3 => {
                let edited: String = Input::new()
                    .with_prompt("Tags (comma separated)")
                    .with_initial_text(draft.tags.join(", "))
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                draft.tags = edited
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            _ => {
                ctx.workflow.cancel(task)?;
                println!(
                    "{}: suggestion discarded; the file stays in the unsorted folder.",
                    task.file_name
                );
                return Ok(());
            }
        }
    }
}

fn print_proposal(file_name: &str, suggestion: &DocumentSuggestion, draft: &ConfirmationDraft) {
    println!("Suggested filing for {}:", file_name);
    output::print_kv("Title", &draft.title);
    output::print_kv("Path", &draft.segments.join(" / "));
    if !draft.tags.is_empty() {
        output::print_kv("Tags", &draft.tags.join(", "));
    }
    if let Some(doc_type) = &suggestion.document_type {
        output::print_kv("Type", doc_type);
    }
    if let Some(date) = &suggestion.date {
        output::print_kv("Date", date);
    }
    if let Some(party) = &suggestion.party {
        output::print_kv("Party", party);
    }
    if let Some(amount) = &suggestion.amount {
        output::print_kv("Amount", amount);
    }
}
