//! CLI command definitions and dispatch.

pub mod folder;
pub mod migrate;
pub mod smart;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use paperhub_analyzer::http::HttpAnalyzer;
use paperhub_core::config::AppConfig;
use paperhub_core::error::AppError;
use paperhub_core::traits::analyzer::ContentAnalyzer;
use paperhub_core::traits::object_store::ObjectStore;
use paperhub_database::connection::DatabasePool;
use paperhub_database::repositories::file::PgFileStore;
use paperhub_database::repositories::folder::PgFolderStore;
use paperhub_database::repositories::unread::PgUnreadStore;
use paperhub_entity::file::store::FileStore;
use paperhub_entity::folder::store::FolderStore;
use paperhub_entity::unread::store::UnreadStore;
use paperhub_intake::folder::resolver::PathResolver;
use paperhub_intake::folder::service::FolderService;
use paperhub_intake::unread::ledger::UnreadLedger;
use paperhub_intake::upload::confirm::ConfirmationWorkflow;
use paperhub_intake::upload::controller::IntakeController;
use paperhub_storage::local::LocalObjectStore;

use crate::output::OutputFormat;

/// PaperHub — Adaptive Document Intake
#[derive(Debug, Parser)]
#[command(name = "paperhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/default.toml plus
    /// config/<ENV>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Upload files into a folder (or the unsorted folder)
    Upload(upload::UploadArgs),
    /// Smart Upload: analyze one file and confirm its filing location
    Smart(smart::SmartArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Folder(args) => folder::execute(args, &self.env, self.format).await,
            Commands::Upload(args) => upload::execute(args, &self.env).await,
            Commands::Smart(args) => smart::execute(args, &self.env).await,
        }
    }
}

/// The fully wired intake pipeline shared by all data commands.
pub struct AppContext {
    pub config: AppConfig,
    pub files: Arc<dyn FileStore>,
    pub folder_service: FolderService,
    pub controller: IntakeController,
    pub workflow: ConfirmationWorkflow,
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: wire every service over a fresh database pool
pub async fn build_context(env: &str) -> Result<AppContext, AppError> {
    let config = load_config(env)?;
    let pool = DatabasePool::connect(&config.database).await?.into_pool();

    let folders: Arc<dyn FolderStore> = Arc::new(PgFolderStore::new(pool.clone()));
    let files: Arc<dyn FileStore> = Arc::new(PgFileStore::new(pool.clone()));
    let counters: Arc<dyn UnreadStore> = Arc::new(PgUnreadStore::new(pool.clone()));
    let objects: Arc<dyn ObjectStore> =
        Arc::new(LocalObjectStore::new(&config.storage.root_path).await?);
    let analyzer: Arc<dyn ContentAnalyzer> = Arc::new(HttpAnalyzer::new(config.analyzer.clone())?);

    let ledger = UnreadLedger::new(counters);
    let resolver = PathResolver::new(folders.clone(), config.intake.max_path_segments);
    let folder_service = FolderService::new(
        folders.clone(),
        files.clone(),
        ledger.clone(),
        config.intake.clone(),
    );
    let controller = IntakeController::new(
        folder_service.clone(),
        files.clone(),
        objects,
        analyzer,
        ledger.clone(),
        config.storage.clone(),
        config.analyzer.locale.clone(),
    );
    let workflow = ConfirmationWorkflow::new(folders, files.clone(), resolver, ledger);

    Ok(AppContext {
        config,
        files,
        folder_service,
        controller,
        workflow,
    })
}
