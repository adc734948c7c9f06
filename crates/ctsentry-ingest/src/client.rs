//! WebSocket ingest client (C1): reads the certificate-update firehose
//! and enqueues one work item per domain onto the bounded work queue.

use std::sync::Arc;
use std::time::Duration;

use ctsentry_core::{PipelineMetrics, WorkItem};
use futures_util::StreamExt;
use tokio::sync::mpsc::Sender;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::envelope::parse_value;
use crate::error::{IngestError, Result};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Connects to a certstream-style WebSocket endpoint and feeds work items
/// into a bounded channel, reconnecting with exponential backoff on any
/// failure until cooperatively shut down.
pub struct IngestClient {
    url: String,
    sender: Sender<WorkItem>,
    metrics: Arc<PipelineMetrics>,
}

impl IngestClient {
    #[must_use]
    pub fn new(url: String, sender: Sender<WorkItem>, metrics: Arc<PipelineMetrics>) -> Self {
        Self { url, sender, metrics }
    }

    /// Run the reconnect loop until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            if shutdown.is_cancelled() {
                return;
            }

            match self.connect_and_stream(&shutdown).await {
                Ok(()) => {
                    info!("ingest stream closed");
                    backoff = INITIAL_BACKOFF;
                }
                Err(e) => {
                    warn!(error = %e, backoff_secs = backoff.as_secs(), "ingest connection failed, reconnecting");
                    tokio::select! {
                        () = tokio::time::sleep(backoff) => {}
                        () = shutdown.cancelled() => return,
                    }
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }

            if shutdown.is_cancelled() {
                return;
            }
        }
    }

    #[instrument(skip(self, shutdown), fields(url = %self.url))]
    async fn connect_and_stream(&self, shutdown: &CancellationToken) -> Result<()> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(&self.url)
            .await
            .map_err(|source| IngestError::Connect {
                url: self.url.clone(),
                source,
            })?;
        info!("connected to certificate stream");

        let (_, mut read) = ws_stream.split();

        loop {
            let message = tokio::select! {
                msg = read.next() => msg,
                () = shutdown.cancelled() => return Ok(()),
            };

            let Some(message) = message else {
                return Ok(());
            };

            match message? {
                Message::Text(text) => self.handle_text(&text).await?,
                Message::Close(frame) => {
                    debug!(?frame, "ingest websocket closed by peer");
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    async fn handle_text(&self, text: &str) -> Result<()> {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "malformed JSON frame, skipping");
                self.metrics.inc_skipped();
                return Ok(());
            }
        };

        let Some(items) = parse_value(&value) else {
            self.metrics.inc_skipped();
            return Ok(());
        };

        for item in items {
            self.metrics.inc_seen();
            if self.sender.send(item).await.is_err() {
                return Err(IngestError::QueueClosed);
            }
        }
        Ok(())
    }
}
