//! Cumulative unread accounting over the per-folder counter store.
//!
//! Counters are cumulative: a folder's count covers its own files plus
//! everything below it, so every mutation touches the folder and all of
//! its ancestors. Counter adjustments after a file is already safely
//! stored or committed are best-effort: a failed adjustment is logged
//! and absorbed, never rolled back into the file operation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use paperhub_core::result::AppResult;
use paperhub_entity::folder::tree::FolderTreeView;
use paperhub_entity::unread::store::UnreadStore;

/// Applies cumulative unread mutations.
#[derive(Clone)]
pub struct UnreadLedger {
    counters: Arc<dyn UnreadStore>,
}

impl UnreadLedger {
    /// Create a ledger over a counter store.
    pub fn new(counters: Arc<dyn UnreadStore>) -> Self {
        Self { counters }
    }

    /// The underlying counter store.
    pub fn counters(&self) -> &Arc<dyn UnreadStore> {
        &self.counters
    }

    /// Adjust one folder by `delta`, logging instead of failing.
    async fn adjust_absorbing(&self, owner_id: Uuid, folder_id: Uuid, delta: i64) {
        if let Err(e) = self.counters.adjust(owner_id, folder_id, delta).await {
            warn!(%owner_id, %folder_id, delta, error = %e, "Unread adjustment failed");
        }
    }

    /// Record one newly stored unread file: +1 on the folder and every
    /// ancestor.
    pub async fn record(&self, owner_id: Uuid, folder_id: Uuid, view: &FolderTreeView<'_>) {
        self.adjust_absorbing(owner_id, folder_id, 1).await;
        for ancestor in view.ancestors_of(folder_id) {
            self.adjust_absorbing(owner_id, ancestor, 1).await;
        }
    }

    /// Move one unread file's contribution from one folder to another.
    /// Ancestors shared by both chains are left untouched.
    pub async fn transfer(
        &self,
        owner_id: Uuid,
        from_folder_id: Uuid,
        to_folder_id: Uuid,
        view: &FolderTreeView<'_>,
    ) {
        if from_folder_id == to_folder_id {
            return;
        }
        let (from_chain, to_chain) =
            disjoint_chains(view, from_folder_id, to_folder_id);
        for folder in from_chain {
            self.adjust_absorbing(owner_id, folder, -1).await;
        }
        for folder in to_chain {
            self.adjust_absorbing(owner_id, folder, 1).await;
        }
    }

    /// Move a whole subtree's cumulative count between ancestor chains
    /// after a folder was re-parented. The folder's own counter (and
    /// those of its descendants) already travel with it.
    pub async fn reparent(
        &self,
        owner_id: Uuid,
        folder_id: Uuid,
        old_ancestors: &[Uuid],
        new_ancestors: &[Uuid],
    ) -> AppResult<()> {
        let amount = self.counters.get(owner_id, folder_id).await?;
        if amount == 0 {
            return Ok(());
        }
        for ancestor in old_ancestors {
            if !new_ancestors.contains(ancestor) {
                self.adjust_absorbing(owner_id, *ancestor, -amount).await;
            }
        }
        for ancestor in new_ancestors {
            if !old_ancestors.contains(ancestor) {
                self.adjust_absorbing(owner_id, *ancestor, amount).await;
            }
        }
        Ok(())
    }

    /// Clear a visited folder's direct contribution (its cumulative
    /// count minus its children's), subtracting it from the folder and
    /// every ancestor. Returns the amount cleared.
    pub async fn mark_visited(
        &self,
        owner_id: Uuid,
        folder_id: Uuid,
        view: &FolderTreeView<'_>,
        counts: &HashMap<Uuid, i64>,
    ) -> AppResult<i64> {
        let own = counts.get(&folder_id).copied().unwrap_or(0);
        let children_sum: i64 = view
            .children_of(Some(folder_id))
            .iter()
            .map(|child| counts.get(&child.id).copied().unwrap_or(0))
            .sum();
        let direct = (own - children_sum).max(0);
        if direct == 0 {
            return Ok(0);
        }

        self.adjust_absorbing(owner_id, folder_id, -direct).await;
        for ancestor in view.ancestors_of(folder_id) {
            self.adjust_absorbing(owner_id, ancestor, -direct).await;
        }
        Ok(direct)
    }
}

/// Ancestor chains (each including the folder itself) with the common
/// ancestry removed from both sides.
fn disjoint_chains(
    view: &FolderTreeView<'_>,
    from: Uuid,
    to: Uuid,
) -> (Vec<Uuid>, Vec<Uuid>) {
    let mut from_chain = vec![from];
    from_chain.extend(view.ancestors_of(from));
    let mut to_chain = vec![to];
    to_chain.extend(view.ancestors_of(to));

    let from_only: Vec<Uuid> = from_chain
        .iter()
        .copied()
        .filter(|id| !to_chain.contains(id))
        .collect();
    let to_only: Vec<Uuid> = to_chain
        .into_iter()
        .filter(|id| !from_chain.contains(id))
        .collect();
    (from_only, to_only)
}
