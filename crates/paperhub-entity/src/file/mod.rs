//! File entity, provenance value object, and store contract.

pub mod model;
pub mod provenance;
pub mod store;

pub use model::{CreateFile, File};
pub use provenance::FileProvenance;
pub use store::FileStore;
