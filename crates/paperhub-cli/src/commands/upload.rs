//! Batch upload command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use clap::Args;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use paperhub_core::error::AppError;
use paperhub_intake::upload::batch::{run_batch, BatchItem};

use crate::output;

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Owner ID the files belong to
    #[arg(short, long)]
    pub owner: Uuid,

    /// Target folder ID (omit to file into the unsorted folder)
    #[arg(long)]
    pub folder: Option<Uuid>,

    /// Files to upload
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Guess the MIME type from a file path.
fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, env: &str) -> Result<(), AppError> {
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
        items.push(BatchItem::new(
            file_name,
            guess_mime(path),
            Bytes::from(content),
        ));
    }

    let delay = Duration::from_millis(ctx.config.intake.batch_delay_ms);
    let report = run_batch(&ctx.controller, args.owner, args.folder, items, delay, &cancel).await;

    for task in &report.tasks {
        match task.error() {
            None => output::print_success(&format!("{} stored", task.file_name)),
            Some((kind, message)) => {
                output::print_warning(&format!("{} failed: {} ({})", task.file_name, message, kind))
            }
        }
    }
    for (file_name, error) in &report.rejected {
        output::print_warning(&format!("{} rejected: {}", file_name, error));
    }

    println!("{} stored, {} failed.", report.stored(), report.failed());
    Ok(())
}
