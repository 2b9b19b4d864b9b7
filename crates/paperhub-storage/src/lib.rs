//! Object store backends for PaperHub.
//!
//! The [`paperhub_core::traits::object_store::ObjectStore`] trait is
//! defined in `paperhub-core`; this crate provides the local filesystem
//! implementation and owner-scoped key construction.

pub mod keys;
pub mod local;
