//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use csp_report_collector::config::CollectorConfig;
use csp_report_collector::sink::MemorySink;
use csp_report_collector::{HttpServer, Shutdown};

/// A running collector bound to an ephemeral port.
pub struct TestCollector {
    pub addr: SocketAddr,
    pub sink: Arc<MemorySink>,
    shutdown: Shutdown,
}

impl TestCollector {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestCollector {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a collector with the given config, recording into a memory sink.
pub async fn start_collector(config: CollectorConfig) -> TestCollector {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let sink = Arc::new(MemorySink::new());
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, sink.clone());
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestCollector { addr, sink, shutdown }
}

/// Client that never pools, so each test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
