//! Shared setup: a live mock server on an ephemeral port and clients for it.

use std::time::Duration;

use mock_server::MockState;
use placeholder_core::{ApiClients, ClientSettings, RequestConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Serve `state` on 127.0.0.1 and return its base URL.
pub async fn spawn_server(state: MockState) -> String {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::serve(listener, state));
    format!("http://{addr}")
}

/// Clients with short retry delays and metrics on.
pub fn clients(base_url: &str) -> ApiClients {
    let mut settings = ClientSettings::new(base_url);
    settings.defaults = fast();
    ApiClients::from_settings(&settings)
}

pub fn fast() -> RequestConfig {
    RequestConfig::default()
        .with_retry_delay(Duration::from_millis(10))
        .with_metrics(true)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
