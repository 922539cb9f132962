//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use address_book::config::AppConfig;
use address_book::http::HttpServer;
use address_book::lifecycle::Shutdown;
use address_book::store::RecordStore;
use address_book_sdk::AddressBookClient;
use tokio::net::TcpListener;

/// A running server on an ephemeral port. Dropping it does not stop the
/// server; call [`TestServer::stop`].
pub struct TestServer {
    pub addr: SocketAddr,
    /// The store behind the server, for asserting on server-side state.
    #[allow(dead_code)]
    pub store: Arc<RecordStore>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// SDK client bypassing any system proxy.
    pub fn client(&self) -> AddressBookClient {
        AddressBookClient::with_client(&self.base_url(), http_client())
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Start the address book with default settings on 127.0.0.1:0.
pub async fn start_server() -> TestServer {
    start_server_with(AppConfig::default()).await
}

/// Plain reqwest client bypassing any system proxy.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

/// Start the address book with the given config, ignoring its bind address.
pub async fn start_server_with(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_store(config, Arc::new(RecordStore::new()));
    let store = server.store();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        store,
        shutdown,
    }
}
