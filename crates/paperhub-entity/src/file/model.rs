//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file record. Always belongs to exactly one existing folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file owner.
    pub owner_id: Uuid,
    /// The folder containing this file (never null once stored).
    pub folder_id: Uuid,
    /// Human-readable title. Starts as the original file name; the
    /// confirmation workflow may replace it with the analyzer's proposal.
    pub title: String,
    /// The owner-scoped key within the object store.
    pub storage_path: String,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// blake3 hex digest of the file content.
    pub content_hash: Option<String>,
    /// Tags for categorization.
    pub tags: Vec<String>,
    /// Free-form metadata bag (JSON). The intake pipeline accumulates
    /// provenance fields here; see [`super::provenance::FileProvenance`].
    pub meta: Option<serde_json::Value>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the title's extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.title
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.title)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub owner_id: Uuid,
    /// The folder to place the file in.
    pub folder_id: Uuid,
    /// Initial title.
    pub title: String,
    /// The owner-scoped key within the object store.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// blake3 hex digest.
    pub content_hash: Option<String>,
    /// Initial tags.
    pub tags: Vec<String>,
    /// Free-form metadata bag.
    pub meta: Option<serde_json::Value>,
}
