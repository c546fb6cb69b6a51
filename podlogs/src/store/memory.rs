use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, PodLogsResult};
use crate::store::ContentStore;

/// In-process [`ContentStore`]. Clones share the same objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list(&self) -> PodLogsResult<Vec<String>> {
        let objects = self.objects.lock().await;

        Ok(objects.keys().cloned().collect())
    }

    async fn has(&self, key: &str) -> PodLogsResult<bool> {
        let objects = self.objects.lock().await;

        Ok(objects.contains_key(key))
    }

    async fn get(&self, key: &str) -> PodLogsResult<Vec<u8>> {
        let objects = self.objects.lock().await;
        match objects.get(key) {
            Some(data) => Ok(data.clone()),
            None => bail!(ErrorKind::StoreObjectNotFound, "object does not exist", key),
        }
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> PodLogsResult<()> {
        let mut objects = self.objects.lock().await;
        debug!(key, size = data.len(), "storing object in memory");
        objects.insert(key.to_string(), data);

        Ok(())
    }
}
