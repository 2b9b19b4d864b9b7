//! Unread counter entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cumulative unread counter for one (owner, folder) pair.
///
/// `count` includes unread files placed directly in the folder and in
/// all of its descendants, so for any folder `F` with children
/// `C1..Cn`, `count(F) >= sum(count(Ci))`. The direct contribution of
/// `F` is `count(F) - sum(count(Ci))`, clamped at 0.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UnreadCounter {
    /// The counter owner.
    pub owner_id: Uuid,
    /// The folder this counter belongs to.
    pub folder_id: Uuid,
    /// Cumulative unread count, never negative.
    pub count: i64,
}
