//! Domain entities for PaperHub: folders, files, unread counters, and the
//! transient upload task state machine, together with the store contracts
//! implemented by `paperhub-database`.

pub mod file;
pub mod folder;
pub mod task;
pub mod unread;
