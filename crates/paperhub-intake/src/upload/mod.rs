//! The per-file upload lifecycle: admission, storage, analysis,
//! confirmation and batch orchestration.

pub mod batch;
pub mod confirm;
pub mod controller;
