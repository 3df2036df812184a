//! HttpBackend against a canned local HTTP server.

use launchpad_providers::*;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves the given responses to consecutive connections and returns the raw
/// requests it received.
async fn spawn_server(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
        requests
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn backend_for(base_url: String) -> HttpBackend {
    HttpBackend::new(&BackendConfig {
        base_url,
        timeout_secs: 5,
        endpoints: Endpoints::default(),
    })
}

#[tokio::test]
async fn test_sentiment_request_and_response() {
    let (url, server) = spawn_server(vec![(200, r#"{"sentiment": true}"#.to_string())]).await;
    let backend = backend_for(url);

    let favorable = backend.analyze_sentiment("launch RKT").await.unwrap();
    assert!(favorable);

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /sentimentAnalysis "));
    assert!(requests[0].to_lowercase().contains("content-type: application/json"));
    assert!(requests[0].ends_with(r#"{"prompt":"launch RKT"}"#));
}

#[tokio::test]
async fn test_deploy_returns_bare_string_address() {
    let (url, server) = spawn_server(vec![(200, r#""0xABC""#.to_string())]).await;
    let backend = backend_for(url);

    let token = TokenInfo {
        name: "Rocket".to_string(),
        symbol: "RKT".to_string(),
        initial_supply: 100_000,
        max_supply: None,
        owner: "0xOwner".to_string(),
    };
    let address = backend.deploy_contract(&token).await.unwrap();
    assert_eq!(address, "0xABC");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /deployContract "));
    assert!(requests[0].contains(r#""initialSupply":100000"#));
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let (url, server) = spawn_server(vec![(500, r#"{"detail": "boom"}"#.to_string())]).await;
    let backend = backend_for(url);

    let request = MintRequest {
        contract_address: "0xABC".to_string(),
        to: "0xOwner".to_string(),
        amount: 1,
    };
    let result = backend.mint_tokens(&request);
    match result.await {
        Err(BackendError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let (url, server) = spawn_server(vec![(200, "not json".to_string())]).await;
    let backend = backend_for(url);

    let result = backend.post_announcement("hello").await;
    assert!(matches!(result, Err(BackendError::Parse(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = backend_for(format!("http://{}", addr));
    let result = backend.analyze_sentiment("anything").await;
    assert!(matches!(result, Err(BackendError::Http(_))));
}

#[tokio::test]
async fn test_agent_directory_calls() {
    let (url, server) = spawn_server(vec![
        (200, json!({"agents": ["alpha", "beta"]}).to_string()),
        (200, json!({"status": "loaded"}).to_string()),
        (200, json!({"name": "gamma"}).to_string()),
    ])
    .await;
    let backend = backend_for(url);

    assert_eq!(backend.list_agents().await.unwrap(), vec!["alpha", "beta"]);
    backend.load_agent("my agent").await.unwrap();
    backend.register_agent(&json!({"name": "gamma"})).await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /listAgents "));
    assert!(requests[1].starts_with("GET /loadAgent?agent_name=my%20agent "));
    assert!(requests[2].starts_with("POST /createAgent "));
    assert!(requests[2].contains(r#"{"agentConfig":{"name":"gamma"}}"#));
}

#[tokio::test]
async fn test_chat_response_fields() {
    let (url, server) = spawn_server(vec![(
        200,
        json!({"status": "success", "result": "done", "tx_url": "https://scan/tx/1"}).to_string(),
    )])
    .await;
    let backend = backend_for(url);

    let reply = backend.chat("send 1 S").await.unwrap();
    assert!(reply.is_success());
    assert_eq!(reply.result, json!("done"));
    assert_eq!(reply.tx_url.as_deref(), Some("https://scan/tx/1"));
    server.await.unwrap();
}
