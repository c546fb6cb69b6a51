use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::bail;
use crate::error::{ErrorKind, PodLogsResult};
use crate::store::ContentStore;

#[derive(Debug, Default)]
struct Inner {
    failing_puts: HashSet<String>,
    failing_reads: bool,
    failing_gets: bool,
    has_calls: Vec<String>,
    puts: Vec<String>,
}

/// Wraps a [`ContentStore`], recording writes and failing chosen calls.
#[derive(Debug, Clone)]
pub struct TestStoreWrapper<S> {
    store: S,
    inner: Arc<Mutex<Inner>>,
}

impl<S> TestStoreWrapper<S> {
    pub fn wrap(store: S) -> Self {
        Self {
            store,
            inner: Arc::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Makes `put` of `key` fail until [`TestStoreWrapper::heal_put`] is called.
    pub fn fail_put(&self, key: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_puts
            .insert(key.to_string());
    }

    pub fn heal_put(&self, key: &str) {
        self.inner.lock().unwrap().failing_puts.remove(key);
    }

    /// Makes every `list`, `has` and `get` call fail.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().failing_reads = fail;
    }

    /// Makes only `get` calls fail, so existence checks still succeed.
    pub fn fail_gets(&self, fail: bool) {
        self.inner.lock().unwrap().failing_gets = fail;
    }

    /// Keys passed to `has`, in call order.
    pub fn has_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().has_calls.clone()
    }

    /// Keys written successfully, in call order.
    pub fn puts(&self) -> Vec<String> {
        self.inner.lock().unwrap().puts.clone()
    }

    fn check_reads(&self) -> PodLogsResult<()> {
        if self.inner.lock().unwrap().failing_reads {
            bail!(ErrorKind::StoreReadFailed, "injected store read failure");
        }

        Ok(())
    }
}

#[async_trait]
impl<S: ContentStore> ContentStore for TestStoreWrapper<S> {
    async fn list(&self) -> PodLogsResult<Vec<String>> {
        self.check_reads()?;
        self.store.list().await
    }

    async fn has(&self, key: &str) -> PodLogsResult<bool> {
        self.inner.lock().unwrap().has_calls.push(key.to_string());
        self.check_reads()?;
        self.store.has(key).await
    }

    async fn get(&self, key: &str) -> PodLogsResult<Vec<u8>> {
        self.check_reads()?;
        if self.inner.lock().unwrap().failing_gets {
            bail!(ErrorKind::StoreReadFailed, "injected store get failure", key);
        }

        self.store.get(key).await
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> PodLogsResult<()> {
        if self.inner.lock().unwrap().failing_puts.contains(key) {
            bail!(ErrorKind::StoreWriteFailed, "injected store write failure", key);
        }

        self.store.put(key, data).await?;
        self.inner.lock().unwrap().puts.push(key.to_string());

        Ok(())
    }
}
