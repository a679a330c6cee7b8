//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use fizzbuzz_server::{FrequencyCounter, HttpServer, ServerConfig, Shutdown};

/// A server running on an ephemeral loopback port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub counter: Arc<FrequencyCounter>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server with the given config on 127.0.0.1 with a free port.
pub async fn start_server(config: ServerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let counter = server.counter();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        counter,
        shutdown,
        handle,
    }
}

/// Client that never pools connections, so shutdown is not held open.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
