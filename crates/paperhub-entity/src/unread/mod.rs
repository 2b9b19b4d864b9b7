//! Unread counter entity and store contract.

pub mod model;
pub mod store;

pub use model::UnreadCounter;
pub use store::UnreadStore;
