#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use sketch_relay::{Config, RelayServer, RelayState};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(150);

pub struct TestServer {
    base_url: String,
    pub state: Arc<RelayState>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    /// Poll until the registry holds `n` peers
    pub async fn wait_for_peers(&self, n: usize) {
        let poll = async {
            while self.state.registry.len() != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(RECV_TIMEOUT, poll)
            .await
            .unwrap_or_else(|_| {
                panic!(
                    "expected {n} peers, registry has {}",
                    self.state.registry.len()
                )
            });
    }
}

pub async fn spawn_test_server(words: &[&str]) -> TestServer {
    spawn_test_server_with_config(Config {
        words: words.iter().map(|w| w.to_string()).collect(),
        ..Config::default()
    })
    .await
}

pub async fn spawn_test_server_with_config(config: Config) -> TestServer {
    let server = RelayServer::new(&config).unwrap();
    let state = server.state().clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
        state,
    }
}

pub async fn connect(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(server.url()).await.expect("Failed to connect");
    ws
}

/// Connect and consume the greeting
pub async fn join(server: &TestServer) -> WsStream {
    let mut ws = connect(server).await;
    let greeting = recv(&mut ws).await;
    assert!(greeting.starts_with("SECRET_WORD:"), "got {greeting}");
    ws
}

pub async fn send(ws: &mut WsStream, frame: &str) {
    ws.send(Message::Text(frame.into())).await.unwrap();
}

pub async fn recv(ws: &mut WsStream) -> String {
    let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
        .await
        .expect("Timed out waiting for a frame")
        .unwrap()
        .unwrap();
    msg.to_text().unwrap().to_string()
}

/// Assert nothing arrives for a short while
pub async fn assert_silent(ws: &mut WsStream) {
    if let Ok(Some(msg)) = tokio::time::timeout(QUIET_PERIOD, ws.next()).await {
        panic!("Expected no frame, got {:?}", msg);
    }
}
