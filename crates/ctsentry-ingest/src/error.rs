use thiserror::Error;

/// Result type alias for the ingest client.
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("websocket stream error: {0}")]
    Stream(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("work queue closed")]
    QueueClosed,
}
