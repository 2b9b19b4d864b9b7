//! Pure folder-tree helpers built from an owner's flat folder list.
//!
//! The relational store returns folders as a flat list; everything that
//! needs ancestry, depth, or child lookups reconstructs the tree here
//! (O(n) per build, fine at per-user folder counts of tens to low
//! hundreds). Keeping this pure lets the path resolver and the invariant
//! checks run against a snapshot without a live backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Folder;

/// An indexed, read-only view over an owner's folder list.
#[derive(Debug)]
pub struct FolderTreeView<'a> {
    by_id: HashMap<Uuid, &'a Folder>,
    children: HashMap<Option<Uuid>, Vec<&'a Folder>>,
}

impl<'a> FolderTreeView<'a> {
    /// Build the view from a flat folder list.
    pub fn new(folders: &'a [Folder]) -> Self {
        let mut by_id = HashMap::with_capacity(folders.len());
        let mut children: HashMap<Option<Uuid>, Vec<&'a Folder>> = HashMap::new();
        for folder in folders {
            by_id.insert(folder.id, folder);
            children.entry(folder.parent_id).or_default().push(folder);
        }
        Self { by_id, children }
    }

    /// Look up a folder by ID.
    pub fn get(&self, id: Uuid) -> Option<&'a Folder> {
        self.by_id.get(&id).copied()
    }

    /// Direct children of a folder (`None` for the root level). The
    /// unsorted singleton is never returned.
    pub fn children_of(&self, parent_id: Option<Uuid>) -> Vec<&'a Folder> {
        self.children
            .get(&parent_id)
            .map(|v| v.iter().copied().filter(|f| !f.is_unsorted()).collect())
            .unwrap_or_default()
    }

    /// Find a direct child by case-sensitive name match. The unsorted
    /// singleton is never matched.
    pub fn find_child(&self, parent_id: Option<Uuid>, name: &str) -> Option<&'a Folder> {
        self.children_of(parent_id)
            .into_iter()
            .find(|f| f.name == name)
    }

    /// Depth of a folder in edges from its root ancestor (0 for roots).
    ///
    /// Returns `None` for unknown IDs. A malformed parent chain (missing
    /// parent or cycle) terminates the walk at the last known folder.
    pub fn depth_of(&self, id: Uuid) -> Option<i32> {
        self.by_id.get(&id)?;
        Some(self.ancestors_of(id).len() as i32)
    }

    /// Ancestor IDs of a folder, nearest-first, excluding the folder
    /// itself. Stops if the chain revisits a folder.
    pub fn ancestors_of(&self, id: Uuid) -> Vec<Uuid> {
        let mut ancestors = Vec::new();
        let mut seen = vec![id];
        let mut current = self.by_id.get(&id).copied();
        while let Some(folder) = current {
            match folder.parent_id {
                Some(parent_id) if !seen.contains(&parent_id) => {
                    ancestors.push(parent_id);
                    seen.push(parent_id);
                    current = self.by_id.get(&parent_id).copied();
                }
                _ => break,
            }
        }
        ancestors
    }

    /// Whether `id` lies in the subtree rooted at `ancestor` (excluding
    /// `ancestor` itself).
    pub fn is_descendant_of(&self, id: Uuid, ancestor: Uuid) -> bool {
        self.ancestors_of(id).contains(&ancestor)
    }

    /// All descendant IDs of a folder, breadth-first.
    pub fn descendants_of(&self, id: Uuid) -> Vec<Uuid> {
        let mut result = Vec::new();
        let mut queue = vec![id];
        while let Some(next) = queue.pop() {
            for child in self.children_of(Some(next)) {
                result.push(child.id);
                queue.push(child.id);
            }
        }
        result
    }

    /// Height of the subtree rooted at `id`, in edges (0 for leaves).
    pub fn height_of(&self, id: Uuid) -> i32 {
        self.children_of(Some(id))
            .into_iter()
            .map(|child| 1 + self.height_of(child.id))
            .max()
            .unwrap_or(0)
    }
}

/// A node in a rendered folder tree, carrying badge counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Depth level (0 for roots).
    pub depth: i32,
    /// Cumulative unread count (this folder plus all descendants).
    pub unread: i64,
    /// Number of files directly in this folder.
    pub file_count: u64,
    /// Child folder nodes, sorted by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Build the owner's render forest from a tree view plus badge data.
    /// The unsorted singleton is excluded.
    pub fn build_forest(
        view: &FolderTreeView<'_>,
        unread: &HashMap<Uuid, i64>,
        file_counts: &HashMap<Uuid, u64>,
    ) -> Vec<FolderNode> {
        Self::build_level(view, None, 0, unread, file_counts)
    }

    fn build_level(
        view: &FolderTreeView<'_>,
        parent_id: Option<Uuid>,
        depth: i32,
        unread: &HashMap<Uuid, i64>,
        file_counts: &HashMap<Uuid, u64>,
    ) -> Vec<FolderNode> {
        let mut folders = view.children_of(parent_id);
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        folders
            .into_iter()
            .map(|folder| FolderNode {
                id: folder.id,
                name: folder.name.clone(),
                depth,
                unread: *unread.get(&folder.id).unwrap_or(&0),
                file_count: *file_counts.get(&folder.id).unwrap_or(&0),
                children: Self::build_level(
                    view,
                    Some(folder.id),
                    depth + 1,
                    unread,
                    file_counts,
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::model::CreateFolder;
    use chrono::Utc;

    fn folder(owner: Uuid, parent: Option<Uuid>, name: &str) -> Folder {
        let data = CreateFolder::user(owner, parent, name);
        Folder {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            name: data.name,
            meta: data.meta,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn unsorted(owner: Uuid) -> Folder {
        let data = CreateFolder::unsorted(owner, "Unsorted");
        Folder {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            name: data.name,
            meta: data.meta,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_depth_and_ancestors() {
        let owner = Uuid::new_v4();
        let a = folder(owner, None, "a");
        let b = folder(owner, Some(a.id), "b");
        let c = folder(owner, Some(b.id), "c");
        let folders = vec![a.clone(), b.clone(), c.clone()];
        let view = FolderTreeView::new(&folders);

        assert_eq!(view.depth_of(a.id), Some(0));
        assert_eq!(view.depth_of(c.id), Some(2));
        assert_eq!(view.ancestors_of(c.id), vec![b.id, a.id]);
        assert!(view.is_descendant_of(c.id, a.id));
        assert!(!view.is_descendant_of(a.id, c.id));
        assert_eq!(view.height_of(a.id), 2);
        assert_eq!(view.height_of(c.id), 0);
    }

    #[test]
    fn test_find_child_is_case_sensitive() {
        let owner = Uuid::new_v4();
        let a = folder(owner, None, "Katzen");
        let folders = vec![a.clone()];
        let view = FolderTreeView::new(&folders);

        assert_eq!(view.find_child(None, "Katzen").map(|f| f.id), Some(a.id));
        assert!(view.find_child(None, "katzen").is_none());
        assert!(view.find_child(None, "Katze").is_none());
    }

    #[test]
    fn test_unsorted_is_invisible_to_matching_and_rendering() {
        let owner = Uuid::new_v4();
        let u = unsorted(owner);
        let a = folder(owner, None, "Rechnungen");
        let folders = vec![u.clone(), a.clone()];
        let view = FolderTreeView::new(&folders);

        assert!(view.find_child(None, "Unsorted").is_none());
        assert_eq!(view.children_of(None).len(), 1);

        let forest =
            FolderNode::build_forest(&view, &HashMap::new(), &HashMap::new());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "Rechnungen");
    }

    #[test]
    fn test_descendants() {
        let owner = Uuid::new_v4();
        let a = folder(owner, None, "a");
        let b = folder(owner, Some(a.id), "b");
        let c = folder(owner, Some(a.id), "c");
        let d = folder(owner, Some(b.id), "d");
        let folders = vec![a.clone(), b.clone(), c.clone(), d.clone()];
        let view = FolderTreeView::new(&folders);

        let mut descendants = view.descendants_of(a.id);
        descendants.sort();
        let mut expected = vec![b.id, c.id, d.id];
        expected.sort();
        assert_eq!(descendants, expected);
    }
}
