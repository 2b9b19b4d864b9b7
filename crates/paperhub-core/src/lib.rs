//! Core building blocks shared by every PaperHub crate: the unified
//! error type, configuration schemas, and the collaborator traits the
//! intake pipeline is written against.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
