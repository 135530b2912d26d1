//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use inline_response::config::RuleSetConfig;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// Start a simple mock backend that returns a fixed response.
///
/// Returns the address it listens on.
#[allow(dead_code)]
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Downstream handler recording whether a request reached it.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct NextHandler {
    invoked: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl NextHandler {
    pub fn router(&self) -> Router {
        let invoked = self.invoked.clone();
        Router::new().fallback(move || {
            let invoked = invoked.clone();
            async move {
                invoked.store(true, Ordering::SeqCst);
                "from downstream"
            }
        })
    }

    pub fn was_invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }
}

/// Parse a YAML rule set.
#[allow(dead_code)]
pub fn rules_from_yaml(input: &str) -> RuleSetConfig {
    serde_yaml::from_str(input).unwrap()
}

/// Build a GET request for `url`.
#[allow(dead_code)]
pub fn get(url: &str) -> Request<Body> {
    Request::builder().uri(url).body(Body::empty()).unwrap()
}

/// Read a response body as text.
#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
