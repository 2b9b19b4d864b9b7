//! In-memory doubles and wiring for pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use paperhub_core::config::{IntakeConfig, ObjectStoreConfig};
use paperhub_core::error::AppError;
use paperhub_core::result::AppResult;
use paperhub_core::traits::analyzer::{AnalysisOutcome, AnalysisRequest, ContentAnalyzer};
use paperhub_core::traits::object_store::ObjectStore;
use paperhub_entity::file::model::{CreateFile, File};
use paperhub_entity::file::store::FileStore;
use paperhub_entity::folder::model::{CreateFolder, Folder};
use paperhub_entity::folder::store::FolderStore;
use paperhub_entity::unread::store::UnreadStore;
use paperhub_intake::folder::resolver::PathResolver;
use paperhub_intake::folder::service::FolderService;
use paperhub_intake::unread::ledger::UnreadLedger;
use paperhub_intake::upload::confirm::ConfirmationWorkflow;
use paperhub_intake::upload::controller::IntakeController;

/// In-memory folder store enforcing sibling-name uniqueness.
#[derive(Debug, Default)]
pub struct MemoryFolderStore {
    folders: Mutex<Vec<Folder>>,
    /// When set, the next create inserts its row but still reports a
    /// conflict, simulating a lost race against an identical writer.
    pub race_next_create: AtomicBool,
}

impl MemoryFolderStore {
    pub fn snapshot(&self) -> Vec<Folder> {
        self.folders.lock().unwrap().clone()
    }
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_child_by_name(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| {
                f.owner_id == owner_id
                    && f.parent_id == parent_id
                    && f.name == name
                    && !f.is_unsorted()
            })
            .cloned())
    }

    async fn find_unsorted(&self, owner_id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.owner_id == owner_id && f.is_unsorted())
            .cloned())
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut folders = self.folders.lock().unwrap();
        if folders.iter().any(|f| {
            f.owner_id == data.owner_id && f.parent_id == data.parent_id && f.name == data.name
        }) {
            return Err(AppError::conflict(
                "A folder with this name already exists here",
            ));
        }
        let folder = Folder {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            name: data.name.clone(),
            meta: data.meta.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        folders.push(folder.clone());
        if self.race_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::conflict(
                "A folder with this name already exists here",
            ));
        }
        Ok(folder)
    }

    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<Folder> {
        let mut folders = self.folders.lock().unwrap();
        let folder = folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))?;
        folder.name = new_name.to_string();
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn set_parent(&self, id: Uuid, new_parent_id: Option<Uuid>) -> AppResult<Folder> {
        let mut folders = self.folders.lock().unwrap();
        let folder = folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))?;
        folder.parent_id = new_parent_id;
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut folders = self.folders.lock().unwrap();
        let before = folders.len();
        folders.retain(|f| f.id != id);
        Ok(folders.len() < before)
    }
}

/// In-memory file store.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<Vec<File>>,
    /// When set, the next create fails with a database error.
    pub fail_next_create: AtomicBool,
}

impl MemoryFileStore {
    pub fn all(&self) -> Vec<File> {
        self.files.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn list_by_folder(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<Vec<File>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.owner_id == owner_id && f.folder_id == folder_id)
            .cloned()
            .collect())
    }

    async fn count_by_folder(&self, owner_id: Uuid) -> AppResult<HashMap<Uuid, u64>> {
        let mut counts = HashMap::new();
        for file in self.files.lock().unwrap().iter() {
            if file.owner_id == owner_id {
                *counts.entry(file.folder_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::database("Simulated insert failure"));
        }
        let file = File {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            folder_id: data.folder_id,
            title: data.title.clone(),
            storage_path: data.storage_path.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            content_hash: data.content_hash.clone(),
            tags: data.tags.clone(),
            meta: data.meta.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.files.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn update(&self, file: &File) -> AppResult<File> {
        let mut files = self.files.lock().unwrap();
        let existing = files
            .iter_mut()
            .find(|f| f.id == file.id)
            .ok_or_else(|| AppError::not_found(format!("File not found: {}", file.id)))?;
        *existing = File {
            updated_at: Utc::now(),
            ..file.clone()
        };
        Ok(existing.clone())
    }

    async fn reassign_folder(
        &self,
        owner_id: Uuid,
        from_folder_id: Uuid,
        to_folder_id: Uuid,
    ) -> AppResult<u64> {
        let mut moved = 0;
        for file in self.files.lock().unwrap().iter_mut() {
            if file.owner_id == owner_id && file.folder_id == from_folder_id {
                file.folder_id = to_folder_id;
                file.updated_at = Utc::now();
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id != id);
        Ok(files.len() < before)
    }
}

/// In-memory unread counter store with clamp-at-zero semantics.
#[derive(Debug, Default)]
pub struct MemoryUnreadStore {
    counts: Mutex<HashMap<(Uuid, Uuid), i64>>,
}

#[async_trait]
impl UnreadStore for MemoryUnreadStore {
    async fn get(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<i64> {
        Ok(*self
            .counts
            .lock()
            .unwrap()
            .get(&(owner_id, folder_id))
            .unwrap_or(&0))
    }

    async fn map_for_owner(&self, owner_id: Uuid) -> AppResult<HashMap<Uuid, i64>> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .iter()
            .filter(|((owner, _), count)| *owner == owner_id && **count > 0)
            .map(|((_, folder), count)| (*folder, *count))
            .collect())
    }

    async fn adjust(&self, owner_id: Uuid, folder_id: Uuid, delta: i64) -> AppResult<i64> {
        let mut counts = self.counts.lock().unwrap();
        let entry = counts.entry((owner_id, folder_id)).or_insert(0);
        *entry = (*entry + delta).max(0);
        Ok(*entry)
    }

    async fn remove(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<()> {
        self.counts.lock().unwrap().remove(&(owner_id, folder_id));
        Ok(())
    }
}

/// In-memory object store.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryObjectStore {
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }
}

/// Analyzer double replaying scripted outcomes in order.
#[derive(Default)]
pub struct StubAnalyzer {
    outcomes: Mutex<VecDeque<AppResult<AnalysisOutcome>>>,
}

impl StubAnalyzer {
    pub fn script(&self, outcome: AnalysisOutcome) {
        self.outcomes.lock().unwrap().push_back(Ok(outcome));
    }

    pub fn script_err(&self, error: AppError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }
}

#[async_trait]
impl ContentAnalyzer for StubAnalyzer {
    async fn analyze(&self, _request: &AnalysisRequest) -> AppResult<AnalysisOutcome> {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("No scripted analyzer outcome")))
    }
}

/// Fully wired pipeline over in-memory collaborators.
pub struct TestEnv {
    pub folders: Arc<MemoryFolderStore>,
    pub files: Arc<MemoryFileStore>,
    pub counters: Arc<MemoryUnreadStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub analyzer: Arc<StubAnalyzer>,
    pub resolver: PathResolver,
    pub service: FolderService,
    pub controller: IntakeController,
    pub workflow: ConfirmationWorkflow,
}

pub fn env() -> TestEnv {
    let folders = Arc::new(MemoryFolderStore::default());
    let files = Arc::new(MemoryFileStore::default());
    let counters = Arc::new(MemoryUnreadStore::default());
    let objects = Arc::new(MemoryObjectStore::default());
    let analyzer = Arc::new(StubAnalyzer::default());

    let intake_config = IntakeConfig::default();
    let storage_config = ObjectStoreConfig::default();

    let folder_store: Arc<dyn FolderStore> = folders.clone();
    let file_store: Arc<dyn FileStore> = files.clone();
    let unread_store: Arc<dyn UnreadStore> = counters.clone();
    let object_store: Arc<dyn ObjectStore> = objects.clone();
    let content_analyzer: Arc<dyn ContentAnalyzer> = analyzer.clone();

    let ledger = UnreadLedger::new(unread_store);
    let resolver = PathResolver::new(folder_store.clone(), intake_config.max_path_segments);
    let service = FolderService::new(
        folder_store.clone(),
        file_store.clone(),
        ledger.clone(),
        intake_config,
    );
    let controller = IntakeController::new(
        service.clone(),
        file_store.clone(),
        object_store,
        content_analyzer,
        ledger.clone(),
        storage_config,
        "de-DE",
    );
    let workflow = ConfirmationWorkflow::new(folder_store, file_store, resolver.clone(), ledger);

    TestEnv {
        folders,
        files,
        counters,
        objects,
        analyzer,
        resolver,
        service,
        controller,
        workflow,
    }
}

/// Current counter value for one folder.
pub async fn counter(env: &TestEnv, owner_id: Uuid, folder_id: Uuid) -> i64 {
    env.counters.get(owner_id, folder_id).await.unwrap()
}
