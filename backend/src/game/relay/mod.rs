mod peer;
mod registry;
mod state;
mod ws;

pub use peer::{DeliveryError, Peer, PeerId};
pub use registry::PeerRegistry;
pub use state::{
    ConnectionSettings, DEFAULT_OUTBOUND_BUFFER, DEFAULT_SEND_TIMEOUT, Dispatch, RelayState,
};
pub use ws::run_connection;
