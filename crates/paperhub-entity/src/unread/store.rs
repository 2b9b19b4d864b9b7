//! Store contract for unread counters.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use paperhub_core::result::AppResult;

/// Relational store contract for unread counters.
///
/// `adjust` is the only mutation and applies a fixed delta to a single
/// row; the cumulative ancestor propagation lives in the unread ledger
/// service, which issues one `adjust` per affected folder.
#[async_trait]
pub trait UnreadStore: Send + Sync + 'static {
    /// Current count for one (owner, folder) pair (0 when absent).
    async fn get(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<i64>;

    /// All non-zero counters for an owner, keyed by folder.
    async fn map_for_owner(&self, owner_id: Uuid) -> AppResult<HashMap<Uuid, i64>>;

    /// Atomically add `delta` to the counter, clamping at 0, creating
    /// the row if needed. Returns the new value.
    async fn adjust(&self, owner_id: Uuid, folder_id: Uuid, delta: i64) -> AppResult<i64>;

    /// Remove the counter row for a folder (used when the folder is
    /// deleted).
    async fn remove(&self, owner_id: Uuid, folder_id: Uuid) -> AppResult<()>;
}
