use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("word list is empty, cannot choose a secret word")]
    EmptyWordList,
    #[error("cannot bind {addr}: {source}")]
    BindAddress {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connect: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),
    #[error("connection to the relay was lost")]
    ConnectionLost,
}
