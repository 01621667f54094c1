// Ports for the remote telemetry API
use crate::domain::reading::Reading;
use async_trait::async_trait;
use futures::stream::BoxStream;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the most recent `limit` readings, ordered oldest to newest
    async fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<Reading>>;
}

/// Signals produced by one connection attempt to the push stream.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Closed { code: Option<u16>, reason: String },
    Error(String),
    Failed(String),
}

pub trait FeedTransport: Send + Sync {
    /// Start a connection attempt. The stream ends after the connection is gone.
    fn open(&self) -> BoxStream<'static, TransportEvent>;
}
