#![allow(dead_code)]

use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use podlogs::store::ContentStore;
use podlogs::store::memory::MemoryStore;
use podlogs::test_utils::store::TestStoreWrapper;
use podlogs_server::startup::run;

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub store: TestStoreWrapper<MemoryStore>,
    server_handle: tokio::task::JoinHandle<io::Result<()>>,
}

impl TestApp {
    pub async fn read_logs(&self, namespace: &str, name: &str, container: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/{namespace}/{name}/{container}", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{path}", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_test_app() -> TestApp {
    let base_address = "127.0.0.1";
    let listener =
        TcpListener::bind(format!("{base_address}:0")).expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let store = TestStoreWrapper::wrap(MemoryStore::new());
    let server = run(listener, Arc::new(store.clone()) as Arc<dyn ContentStore>)
        .expect("failed to start server");
    let server_handle = tokio::spawn(server);

    TestApp {
        address: format!("http://{base_address}:{port}"),
        api_client: reqwest::Client::new(),
        store,
        server_handle,
    }
}
