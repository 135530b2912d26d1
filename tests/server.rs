//! End-to-end tests: real listener, real upstream, real client.

use std::time::Duration;

use inline_response::config::{parse_config, Format, ServerConfig};
use inline_response::http::HttpServer;
use inline_response::lifecycle::Shutdown;

mod common;

fn toml_config(input: &str) -> ServerConfig {
    parse_config(input, Format::Toml).unwrap()
}

async fn start_server(config: ServerConfig) -> (String, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    (format!("http://{}", addr), shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_inline_responses_and_forwarding() {
    let backend_addr = common::start_mock_backend("Hello from backend").await;

    let config = toml_config(&format!(
        r#"
[upstream]
address = "{}"

[[rules.matchers]]
statusCode = 418
path = {{ abs = "/teapot" }}
response = {{ raw = "short and stout" }}

[[rules.matchers]]
statusCode = 200
path = {{ prefix = "/status" }}
response.json = {{ healthy = true, checks = 3 }}

[[rules.matchers]]
statusCode = 200
path = {{ regex = "^/echo/" }}
response = {{ template = "{{{{ .Method }}}} {{{{ .URL.Path }}}} {{{{ .Proto }}}}" }}
"#,
        backend_addr
    ));

    let (base, shutdown) = start_server(config).await;
    let client = client();

    let res = client.get(format!("{}/teapot", base)).send().await.unwrap();
    assert_eq!(res.status(), 418);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "short and stout");

    let res = client.get(format!("{}/status/db", base)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json, serde_json::json!({"checks": 3, "healthy": true}));

    let res = client.delete(format!("{}/echo/x", base)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "DELETE /echo/x HTTP/1.1");

    let res = client.get(format!("{}/anything/else", base)).send().await.unwrap();
    assert_eq!(res.status(), 200, "Unmatched request should reach the backend");
    assert_eq!(res.text().await.unwrap(), "Hello from backend");

    shutdown.trigger();
}

#[tokio::test]
async fn test_fallback_without_upstream() {
    let mut config = toml_config(
        r#"
[[rules.matchers]]
statusCode = 301
path = { prefix = "/old" }

[rules.fallback]
statusCode = 503
response = { raw = "maintenance" }
"#,
    );
    config.rules.debug = true;

    let (base, shutdown) = start_server(config).await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    let res = client.get(format!("{}/old/page", base)).send().await.unwrap();
    assert_eq!(res.status(), 301);
    assert_eq!(res.text().await.unwrap(), "");

    let res = client.get(format!("{}/new", base)).send().await.unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "maintenance");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let mut config = ServerConfig::default();
    config.upstream.address = Some(addr.to_string());

    let (base, shutdown) = start_server(config).await;

    let res = client().get(format!("{}/x", base)).send().await.unwrap();
    assert_eq!(res.status(), 502);

    shutdown.trigger();
}
