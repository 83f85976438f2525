use super::peer::{Peer, PeerId};
use super::state::RelayState;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Run one relay connection from accept to close.
///
/// The secret word is queued as the peer's first frame before the peer is
/// registered, so it always precedes any relayed stroke, and a client that
/// has seen it is already part of the broadcast set. A writer task drains
/// the outbound queue while the reader processes frames one at a time, which
/// keeps each sender's strokes in order. Whichever side stops first takes the
/// other down, and the peer is deregistered.
pub async fn run_connection(socket: WebSocket, state: Arc<RelayState>) {
    let (sender, receiver) = socket.split();

    let (peer, rx) = Peer::new(state.settings.outbound_buffer);
    let peer_id = peer.id();
    if let Err(err) = peer.try_deliver(state.greeting()) {
        warn!(%peer_id, %err, "Could not queue greeting");
        return;
    }
    state.registry.add(peer);
    info!(%peer_id, peers = state.registry.len(), "Peer connected");

    let mut send_task = tokio::spawn(send_loop(
        sender,
        rx,
        peer_id,
        state.settings.send_timeout,
    ));
    let mut recv_task = tokio::spawn(receive_loop(receiver, peer_id, state.clone()));

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.remove(peer_id);
    info!(%peer_id, peers = state.registry.len(), "Peer disconnected");
}

async fn send_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<String>,
    peer_id: PeerId,
    send_timeout: Duration,
) {
    // Ends when the registry drops the peer or the socket stops accepting writes
    while let Some(frame) = rx.recv().await {
        debug!(%peer_id, frame, "Sending frame");
        match tokio::time::timeout(send_timeout, sender.send(Message::Text(frame))).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                debug!(%peer_id, %err, "Write failed");
                break;
            }
            Err(_) => {
                warn!(%peer_id, ?send_timeout, "Write timed out");
                break;
            }
        }
    }
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    peer_id: PeerId,
    state: Arc<RelayState>,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%peer_id, %err, "Read failed");
                break;
            }
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => {
                debug!(%peer_id, "Received non-text message, ignoring");
                continue;
            }
        };

        debug!(%peer_id, raw = %text, "Received frame");
        state.handle_frame(peer_id, &text);
    }
}
