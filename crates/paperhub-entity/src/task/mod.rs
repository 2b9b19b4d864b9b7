//! Transient upload task and its state machine.

pub mod model;
pub mod state;

pub use model::UploadTask;
pub use state::{TaskEvent, TaskState};
