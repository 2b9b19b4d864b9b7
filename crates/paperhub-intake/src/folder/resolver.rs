//! Find-or-create resolution of suggested folder paths.
//!
//! Given ordered name segments like `["Rechnungen", "2024", "Strom"]`,
//! the resolver walks from the root, reusing an existing child on an
//! exact case-sensitive name match and creating it otherwise. Matching
//! never normalizes: trust what the analyzer proposes against the
//! folder list it was shown, rather than second-guess near-matches.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_entity::folder::model::{CreateFolder, Folder, MAX_FOLDER_DEPTH};
use paperhub_entity::folder::store::FolderStore;
use paperhub_entity::folder::tree::FolderTreeView;

/// The result of resolving one suggested path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResolution {
    /// The deepest folder reached; files are filed here.
    pub folder_id: Uuid,
    /// IDs of folders the walk created, in root-to-leaf order.
    pub created: Vec<Uuid>,
    /// Whether trailing segments were dropped to honor the depth limit
    /// or the segment cap.
    pub truncated: bool,
}

/// Resolves analyzer-suggested paths into concrete folders.
#[derive(Clone)]
pub struct PathResolver {
    folders: Arc<dyn FolderStore>,
    max_segments: usize,
}

impl PathResolver {
    /// Create a resolver over a folder store.
    pub fn new(folders: Arc<dyn FolderStore>, max_segments: usize) -> Self {
        Self {
            folders,
            max_segments,
        }
    }

    /// Drop empty segments and cap the segment count. Returns the usable
    /// segments and whether the cap dropped any.
    fn clean_segments(&self, segments: &[String]) -> (Vec<String>, bool) {
        let mut cleaned: Vec<String> = segments
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let capped = cleaned.len() > self.max_segments;
        cleaned.truncate(self.max_segments);
        (cleaned, capped)
    }

    /// Walk the segments from the root, finding or creating each level.
    ///
    /// `snapshot` is the owner's folder list as of the commit; the walk
    /// matches against it plus its own creations. A path that would
    /// nest deeper than [`MAX_FOLDER_DEPTH`] is truncated at the last
    /// admissible level rather than rejected. A concurrent create of
    /// the same segment surfaces as `Conflict`, in which case the walk
    /// re-fetches the child by name and descends into it.
    pub async fn resolve(
        &self,
        owner_id: Uuid,
        segments: &[String],
        snapshot: &[Folder],
    ) -> AppResult<PathResolution> {
        let (cleaned, capped) = self.clean_segments(segments);
        if cleaned.is_empty() {
            return Err(AppError::validation(
                "Suggested path has no usable segments",
            ));
        }

        let view = FolderTreeView::new(snapshot);
        let mut parent_id: Option<Uuid> = None;
        let mut current_id: Option<Uuid> = None;
        let mut created = Vec::new();
        let mut truncated = capped;

        for (index, name) in cleaned.iter().enumerate() {
            let level = index as i32 + 1;
            if level > MAX_FOLDER_DEPTH {
                truncated = true;
                break;
            }

            let existing = match parent_id {
                // Freshly created parents have no children anywhere yet.
                Some(id) if created.contains(&id) => None,
                _ => view.find_child(parent_id, name).map(|f| f.id),
            };

            let folder_id = match existing {
                Some(id) => {
                    debug!(%id, segment = %name, "Reusing existing folder");
                    id
                }
                None => {
                    self.create_segment(owner_id, parent_id, name, &mut created)
                        .await?
                }
            };

            parent_id = Some(folder_id);
            current_id = Some(folder_id);
        }

        // At least one segment resolved: level 1 is always admissible.
        let folder_id = current_id
            .ok_or_else(|| AppError::internal("Path walk resolved no folder"))?;

        if !created.is_empty() {
            info!(
                %owner_id,
                %folder_id,
                created = created.len(),
                truncated,
                "Resolved suggested path"
            );
        }

        Ok(PathResolution {
            folder_id,
            created,
            truncated,
        })
    }

    async fn create_segment(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
        created: &mut Vec<Uuid>,
    ) -> AppResult<Uuid> {
        let data = CreateFolder::user(owner_id, parent_id, name);
        match self.folders.create(&data).await {
            Ok(folder) => {
                created.push(folder.id);
                Ok(folder.id)
            }
            // Another walk created the same segment first; descend into
            // that writer's folder instead.
            Err(e) if e.kind == ErrorKind::Conflict => {
                debug!(segment = %name, "Segment created concurrently, re-fetching");
                self.folders
                    .find_child_by_name(owner_id, parent_id, name)
                    .await?
                    .map(|f| f.id)
                    .ok_or(e)
            }
            Err(e) => Err(e),
        }
    }
}
