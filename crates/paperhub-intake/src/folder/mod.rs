//! Folder management and suggested-path resolution.

pub mod resolver;
pub mod service;
