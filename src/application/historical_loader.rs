// Historical loader - One-shot seed of the display windows
use crate::application::dashboard_service::DashboardUpdate;
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::reading::Reading;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct HistoricalLoader {
    source: Arc<dyn TelemetrySource>,
    limit: usize,
}

impl HistoricalLoader {
    pub fn new(source: Arc<dyn TelemetrySource>, limit: usize) -> Self {
        Self { source, limit }
    }

    pub async fn load(&self) -> anyhow::Result<Vec<Reading>> {
        self.source.fetch_recent(self.limit).await
    }

    /// Fetch once and hand the result to the dashboard. Failures are logged, never retried.
    pub async fn seed_into(self, updates: mpsc::Sender<DashboardUpdate>) {
        match self.load().await {
            Ok(readings) => {
                tracing::info!("Received {} historical readings", readings.len());
                if updates.send(DashboardUpdate::Seed(readings)).await.is_err() {
                    tracing::warn!("Dashboard stopped before historical data arrived");
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch historical readings: {:#}", e);
            }
        }
    }
}
