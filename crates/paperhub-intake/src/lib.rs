//! The adaptive intake pipeline: folder management, AI-suggested path
//! resolution, the per-file upload lifecycle and unread accounting.
//!
//! Services here are plain structs over store trait objects; all
//! invariant enforcement (depth, cycles, sibling uniqueness, cumulative
//! unread counts) lives at this layer, backed by the relational stores
//! in `paperhub-database` and the object store in `paperhub-storage`.

pub mod folder;
pub mod unread;
pub mod upload;
