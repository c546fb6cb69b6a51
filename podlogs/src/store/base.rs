use async_trait::async_trait;

use crate::error::PodLogsResult;

/// Key/value blob store holding archived artifacts.
///
/// Writes are unconditional. Callers that need write-once semantics check [`ContentStore::has`]
/// first; the two calls are not atomic, so concurrent writers of the same key must write
/// identical content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Returns every key in the store.
    async fn list(&self) -> PodLogsResult<Vec<String>>;

    /// Returns whether `key` exists. A missing key is `Ok(false)`, never an error.
    async fn has(&self, key: &str) -> PodLogsResult<bool>;

    /// Returns the bytes stored at `key`, failing if it does not exist.
    async fn get(&self, key: &str) -> PodLogsResult<Vec<u8>>;

    /// Stores `data` at `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Vec<u8>) -> PodLogsResult<()>;
}
