//! Store implementations backed by PostgreSQL.

pub mod file;
pub mod folder;
pub mod unread;
