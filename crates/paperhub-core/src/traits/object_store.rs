//! Object store trait for persisted file bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the object store collaborator.
///
/// Keys are namespaced per owner and carry a uniqueness-breaking
/// timestamp plus the sanitized original name; key construction lives in
/// `paperhub-storage::keys`. The core never interprets keys.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write the full object body under the given key.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the full object body.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
