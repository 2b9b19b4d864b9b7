//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use paperhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Owner ID all operations are scoped to
    #[arg(short, long)]
    pub owner: Uuid,

    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Show the folder tree with unread badges
    Tree,
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: Uuid,
        /// New name
        name: String,
    },
    /// Move a folder under a new parent
    Move {
        /// Folder ID
        id: Uuid,
        /// New parent folder ID (omit to move to the root level)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Delete a folder; its files move to the unsorted folder
    Delete {
        /// Folder ID
        id: Uuid,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Mark a folder as visited, clearing its unread badge
    Visit {
        /// Folder ID
        id: Uuid,
    },
    /// List the files directly inside a folder
    Files {
        /// Folder ID
        id: Uuid,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// Title
    title: String,
    /// Size in bytes
    size: i64,
    /// Tags
    tags: String,
    /// Created at
    created_at: String,
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let ctx = super::build_context(env).await?;
    let service = &ctx.folder_service;
    let owner = args.owner;

    match &args.command {
        FolderCommand::Tree => {
            let tree = service.list_tree(owner).await?;
            output::print_tree(&tree, format);
        }
        FolderCommand::Create { name, parent } => {
            let folder = service.create(owner, *parent, name).await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Rename { id, name } => {
            let folder = service.rename(owner, *id, name).await?;
            output::print_success(&format!("Folder renamed to '{}'", folder.name));
        }
        FolderCommand::Move { id, parent } => {
            service.move_folder(owner, *id, *parent).await?;
            output::print_success("Folder moved.");
        }
        FolderCommand::Delete { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(
                        "Delete this folder and its subfolders? Files move to the unsorted folder.",
                    )
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let reassigned = service.delete(owner, *id).await?;
            output::print_success(&format!(
                "Folder deleted; {} file(s) moved to the unsorted folder.",
                reassigned
            ));
        }
        FolderCommand::Visit { id } => {
            let cleared = service.visit(owner, *id).await?;
            output::print_success(&format!("Marked as visited ({} unread cleared).", cleared));
        }
        FolderCommand::Files { id } => {
            let files = ctx.files.list_by_folder(owner, *id).await?;
            let rows: Vec<FileRow> = files
                .iter()
                .map(|f| FileRow {
                    id: f.id.to_string(),
                    title: f.title.clone(),
                    size: f.size_bytes,
                    tags: f.tags.join(", "),
                    created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
