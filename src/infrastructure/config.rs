use anyhow::{bail, Context};
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://apiwater-production.up.railway.app";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_stream_path")]
    pub stream_path: String,
    #[serde(default = "default_historical_path")]
    pub historical_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    #[serde(default = "default_chart_capacity")]
    pub chart_capacity: usize,
    #[serde(default = "default_table_capacity")]
    pub table_capacity: usize,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    #[serde(default = "default_reconnect_backoff_ms")]
    pub reconnect_backoff_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_stream_path() -> String {
    "/ws".to_string()
}

fn default_historical_path() -> String {
    "/api/historical".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_chart_capacity() -> usize {
    50
}

fn default_table_capacity() -> usize {
    20
}

fn default_timezone() -> String {
    "America/Lima".to_string()
}

fn default_reconnect_backoff_ms() -> u64 {
    5000
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            chart_capacity: default_chart_capacity(),
            table_capacity: default_table_capacity(),
            timezone: default_timezone(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: default_reconnect_backoff_ms(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ApiSettings {
    fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Push endpoint: the base origin with its scheme switched from http(s) to ws(s).
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.origin().replacen("http", "ws", 1), self.stream_path)
    }

    pub fn historical_url(&self) -> String {
        format!("{}{}", self.origin(), self.historical_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DisplaySettings {
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid display timezone {:?}: {}", self.timezone, e))
    }
}

impl FeedSettings {
    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_backoff_ms)
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api.base_url.starts_with("http") {
            bail!("api.base_url must be an http(s) origin, got {:?}", self.api.base_url);
        }
        if self.display.chart_capacity == 0 || self.display.table_capacity == 0 {
            bail!("display capacities must be at least 1");
        }
        self.display.timezone()?;
        Ok(())
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder().set_default("api.base_url", DEFAULT_BASE_URL)?)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<AppConfig> {
    let settings = builder.build().context("Failed to assemble configuration")?;
    let app_config: AppConfig = settings
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    app_config.validate()?;
    Ok(app_config)
}

/// Load from `config/dashboard.*` (optional) overlaid with `AQUAVIEW__*` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    finish(
        builder()?
            .add_source(config::File::with_name("config/dashboard").required(false))
            .add_source(
                config::Environment::with_prefix("AQUAVIEW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            ),
    )
}

#[cfg(test)]
pub fn parse_app_config(toml: &str) -> anyhow::Result<AppConfig> {
    finish(builder()?.add_source(config::File::from_str(toml, config::FileFormat::Toml)))
}
