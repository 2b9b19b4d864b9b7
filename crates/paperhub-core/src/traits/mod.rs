//! Collaborator traits the intake pipeline is written against.
//!
//! The traits are defined here in `paperhub-core` and implemented by the
//! backend crates (`paperhub-storage`, `paperhub-analyzer`,
//! `paperhub-database`). Tests substitute in-memory doubles.

pub mod analyzer;
pub mod object_store;
