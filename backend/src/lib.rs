pub mod client;
mod config;
mod error;
mod game;

pub use config::Config;
pub use error::{ClientError, ConfigError};
pub use game::core::{FrameError, Message, SessionState, Stroke, WordList, WordProvider};
pub use game::messages;
pub use game::relay::{
    ConnectionSettings, DeliveryError, Dispatch, Peer, PeerId, PeerRegistry, RelayState,
};

use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade, ws::WebSocket},
    response::Response,
    routing::get,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct Status {
    peers: usize,
}

async fn status(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        peers: state.relay.registry.len(),
    })
}

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayState>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    game::relay::run_connection(socket, state.relay).await;
}

/// The process-wide relay: one session, one peer set
pub struct RelayServer {
    state: Arc<RelayState>,
}

impl RelayServer {
    /// Pick the secret word and set up an empty peer set.
    /// Fails before anything is served if the word list is empty.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let words = config.word_list()?;
        let session = SessionState::new(&words);
        info!(secret_word = session.secret_word(), "Session started");

        Ok(Self::with_state(RelayState::new(
            session,
            config.connection_settings(),
        )))
    }

    pub fn with_state(state: RelayState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> &Arc<RelayState> {
        &self.state
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            relay: self.state.clone(),
        };

        Router::new()
            .route("/", get(ws_handler))
            .route("/ws", get(ws_handler))
            .route("/health", get(health))
            .route("/status", get(status))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Accept connections until the process ends
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }

    /// Accept connections until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Bind the relay's listening socket
pub async fn bind(addr: &str) -> Result<TcpListener, ConfigError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ConfigError::BindAddress {
            addr: addr.to_string(),
            source,
        })
}
