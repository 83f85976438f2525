use super::peer::PeerId;
use super::registry::PeerRegistry;
use crate::game::core::{Message, SessionState};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection transport limits
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Frames queued for a peer before it counts as hung
    pub outbound_buffer: usize,
    /// Longest a single write to a peer may take
    pub send_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

/// What the relay did with one inbound frame
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    Relayed { delivered: usize },
    Answered { correct: bool },
    Ignored,
}

/// Shared state of the relay: the session plus everyone connected to it
pub struct RelayState {
    pub session: SessionState,
    pub registry: PeerRegistry,
    pub settings: ConnectionSettings,
}

impl RelayState {
    pub fn new(session: SessionState, settings: ConnectionSettings) -> Self {
        Self {
            session,
            registry: PeerRegistry::new(),
            settings,
        }
    }

    /// The frame every new connection receives first
    pub fn greeting(&self) -> String {
        Message::SecretWord {
            word: self.session.secret_word().to_string(),
        }
        .encode()
        .unwrap_or_default()
    }

    /// Decode a frame from `sender` and act on it
    pub fn handle_frame(&self, sender: PeerId, raw: &str) -> Dispatch {
        match Message::decode(raw) {
            msg @ Message::Draw(_) => {
                let Some(frame) = msg.encode() else {
                    return Dispatch::Ignored;
                };
                let delivered = self.registry.broadcast_except(sender, &frame);
                debug!(%sender, delivered, "Relayed stroke");
                Dispatch::Relayed { delivered }
            }
            Message::Guess { text } => {
                let correct = self.session.evaluate(&text);
                info!(%sender, guess = text, correct, "Guess evaluated");
                if let Some(reply) = (Message::Result { correct }).encode() {
                    self.registry.send_to(sender, reply);
                }
                Dispatch::Answered { correct }
            }
            Message::SecretWord { .. } | Message::Result { .. } => {
                debug!(%sender, raw, "Ignoring server-only frame from client");
                Dispatch::Ignored
            }
            Message::Unknown => Dispatch::Ignored,
        }
    }
}
