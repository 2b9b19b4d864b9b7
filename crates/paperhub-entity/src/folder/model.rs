//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum nesting level, counted with root folders at level 1. A chain
/// `a → b → c` sits at the limit; creating below `c` is rejected.
pub const MAX_FOLDER_DEPTH: i32 = 3;

/// `meta.type` value marking the per-owner unsorted singleton.
pub const UNSORTED_META_TYPE: &str = "unsorted";

/// A folder in an owner's filing hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The folder owner. Never changes after creation.
    pub owner_id: Uuid,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<Uuid>,
    /// Folder name, unique among siblings (case-sensitive).
    pub name: String,
    /// Free-form metadata bag (JSON).
    pub meta: Option<serde_json::Value>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this is the owner's unsorted singleton.
    ///
    /// The unsorted folder is excluded from tree rendering, path
    /// matching, and the depth rules applied to user-created folders.
    pub fn is_unsorted(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|m| m.get("type"))
            .and_then(|t| t.as_str())
            == Some(UNSORTED_META_TYPE)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub owner_id: Uuid,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// Free-form metadata bag.
    pub meta: Option<serde_json::Value>,
}

impl CreateFolder {
    /// Data for an ordinary user-visible folder.
    pub fn user(owner_id: Uuid, parent_id: Option<Uuid>, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            parent_id,
            name: name.into(),
            meta: None,
        }
    }

    /// Data for the owner's unsorted singleton.
    pub fn unsorted(owner_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            parent_id: None,
            name: name.into(),
            meta: Some(serde_json::json!({ "type": UNSORTED_META_TYPE })),
        }
    }
}
