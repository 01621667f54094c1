// HTTP implementation of the historical telemetry source
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::reading::Reading;
use crate::infrastructure::config::ApiSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpTelemetrySource {
    http: reqwest::Client,
    historical_url: String,
}

impl HttpTelemetrySource {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            historical_url: settings.historical_url(),
        })
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Reading>> {
        tracing::debug!("Requesting {} historical readings from {}", limit, self.historical_url);

        let response = self
            .http
            .get(&self.historical_url)
            .query(&[("limit", limit)])
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send historical request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Historical request failed with status {}: {}", status, body);
        }

        response
            .json::<Vec<Reading>>()
            .await
            .context("Failed to parse historical response")
    }
}
