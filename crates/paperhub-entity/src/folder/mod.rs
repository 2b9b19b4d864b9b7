//! Folder entity, tree helpers, and store contract.

pub mod model;
pub mod store;
pub mod tree;

pub use model::{CreateFolder, Folder, MAX_FOLDER_DEPTH, UNSORTED_META_TYPE};
pub use store::FolderStore;
pub use tree::{FolderNode, FolderTreeView};
