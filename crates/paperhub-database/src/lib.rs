//! PostgreSQL persistence for PaperHub.
//!
//! Implements the store contracts from `paperhub-entity` with sqlx
//! runtime queries. Schema lives in `migrations/`; the folder table
//! carries a `(owner_id, parent_id, name)` uniqueness constraint
//! (NULLS NOT DISTINCT) that the path resolver relies on to survive
//! concurrent find-or-create races.

pub mod connection;
pub mod migration;
pub mod repositories;
