//! Client side of the relay protocol.
//!
//! A front end connects with [`RelayClient::connect`], calls
//! [`RelayClient::send_stroke`] / [`RelayClient::send_guess`] on user input,
//! and renders whatever arrives on the returned [`RelayEvent`] receiver.

use crate::error::ClientError;
use crate::game::core::{Message, Stroke};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const OUTBOUND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Something the relay told us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    SecretWord(String),
    RemoteStroke(Stroke),
    GuessResult(bool),
    /// The connection ended. No further events follow.
    ConnectionLost,
}

impl RelayEvent {
    fn from_message(msg: Message) -> Option<Self> {
        match msg {
            Message::SecretWord { word } => Some(RelayEvent::SecretWord(word)),
            Message::Draw(stroke) => Some(RelayEvent::RemoteStroke(stroke)),
            Message::Result { correct } => Some(RelayEvent::GuessResult(correct)),
            Message::Guess { .. } | Message::Unknown => None,
        }
    }
}

pub struct RelayClient {
    outbound: mpsc::Sender<String>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl RelayClient {
    /// Connect to a relay at `url` (e.g. `ws://127.0.0.1:12000`)
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<RelayEvent>), ClientError> {
        let (ws, _) = connect_async(url).await.map_err(ClientError::Connect)?;
        info!(url, "Connected to relay");

        let (sink, stream) = ws.split();
        let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

        let client = Self {
            outbound,
            writer: tokio::spawn(write_loop(sink, outbound_rx)),
            reader: tokio::spawn(read_loop(stream, events_tx)),
        };

        Ok((client, events_rx))
    }

    pub async fn send_stroke(&self, stroke: Stroke) -> Result<(), ClientError> {
        self.send(Message::Draw(stroke)).await
    }

    /// Send a guess. Blank guesses are not sent; returns whether it went out.
    pub async fn send_guess(&self, text: &str) -> Result<bool, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.send(Message::Guess {
            text: text.to_string(),
        })
        .await?;
        Ok(true)
    }

    async fn send(&self, msg: Message) -> Result<(), ClientError> {
        let Some(frame) = msg.encode() else {
            return Ok(());
        };
        self.outbound
            .send(frame)
            .await
            .map_err(|_| ClientError::ConnectionLost)
    }

    /// Close the connection after flushing anything already queued
    pub async fn close(self) {
        drop(self.outbound);
        if let Err(err) = self.writer.await {
            debug!(%err, "Writer task ended abnormally");
        }
        self.reader.abort();
    }
}

async fn write_loop(mut sink: SplitSink<WsStream, WsMessage>, mut rx: mpsc::Receiver<String>) {
    while let Some(frame) = rx.recv().await {
        if let Err(err) = sink.send(WsMessage::Text(frame.into())).await {
            warn!(%err, "Failed to send frame");
            return;
        }
    }
    let _ = sink.close().await;
}

async fn read_loop(mut stream: SplitStream<WsStream>, events: mpsc::Sender<RelayEvent>) {
    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "Read failed");
                break;
            }
        };

        let text = match msg {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            _ => continue,
        };

        let Some(event) = RelayEvent::from_message(Message::decode(text.as_str())) else {
            debug!(raw = %text.as_str(), "Ignoring frame");
            continue;
        };

        if events.send(event).await.is_err() {
            // Nobody is listening any more
            return;
        }
    }

    info!("Connection to relay lost");
    let _ = events.send(RelayEvent::ConnectionLost).await;
}
