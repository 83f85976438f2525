use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type PeerId = Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outbound queue is full")]
    Full,
    #[error("connection is gone")]
    Closed,
}

/// Server-side handle to one connected client.
///
/// The registry holds the only `Peer` for a connection, so dropping it closes
/// the outbound queue and ends the connection's writer task.
#[derive(Debug)]
pub struct Peer {
    id: PeerId,
    outbound: mpsc::Sender<String>,
}

impl Peer {
    /// Create a peer and the receiving end of its outbound queue
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        let peer = Self {
            id: Uuid::new_v4(),
            outbound,
        };
        (peer, rx)
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Queue a frame without waiting
    pub fn try_deliver(&self, frame: String) -> Result<(), DeliveryError> {
        self.outbound.try_send(frame).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}
