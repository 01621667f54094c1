// Live feed subscriber - Reconnecting subscription to the telemetry push stream
use crate::application::dashboard_service::DashboardUpdate;
use crate::application::telemetry_source::{FeedTransport, TransportEvent};
use crate::domain::dashboard::FeedStatus;
use crate::domain::reading::Reading;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEffect {
    Status(FeedStatus),
    Deliver(Reading),
    Reconnect(Duration),
}

/// Connection lifecycle, independent of any transport.
#[derive(Debug, Clone)]
pub struct FeedStateMachine {
    state: FeedStatus,
    backoff: Duration,
}

impl FeedStateMachine {
    pub fn new(backoff: Duration) -> Self {
        Self {
            state: FeedStatus::Disconnected,
            backoff,
        }
    }

    pub fn state(&self) -> FeedStatus {
        self.state
    }

    pub fn begin_connect(&mut self) -> Vec<FeedEffect> {
        match self.state {
            FeedStatus::Disconnected => self.transition(FeedStatus::Connecting),
            _ => Vec::new(),
        }
    }

    pub fn on_event(&mut self, event: TransportEvent) -> Vec<FeedEffect> {
        match (self.state, event) {
            (FeedStatus::Connecting, TransportEvent::Opened) => {
                tracing::info!("Live feed connection established");
                self.transition(FeedStatus::Connected)
            }
            (FeedStatus::Connected, TransportEvent::Message(text)) => {
                match Reading::from_json(&text) {
                    Ok(reading) => {
                        tracing::debug!(id = %reading.id, "Live reading received");
                        vec![FeedEffect::Deliver(reading)]
                    }
                    Err(e) => {
                        tracing::warn!("Discarding live message: {}", e);
                        Vec::new()
                    }
                }
            }
            (
                FeedStatus::Connecting | FeedStatus::Connected,
                TransportEvent::Closed { code, reason },
            ) => {
                tracing::warn!(?code, "Live feed connection closed: {}", reason);
                self.drop_connection()
            }
            (FeedStatus::Connecting | FeedStatus::Connected, TransportEvent::Error(e))
            | (FeedStatus::Connecting | FeedStatus::Connected, TransportEvent::Failed(e)) => {
                tracing::error!("Live feed transport error: {}", e);
                self.drop_connection()
            }
            (state, event) => {
                tracing::debug!(?state, ?event, "Ignoring transport event");
                Vec::new()
            }
        }
    }

    fn drop_connection(&mut self) -> Vec<FeedEffect> {
        let mut effects = self.transition(FeedStatus::Disconnected);
        effects.push(FeedEffect::Reconnect(self.backoff));
        effects
    }

    fn transition(&mut self, next: FeedStatus) -> Vec<FeedEffect> {
        self.state = next;
        vec![FeedEffect::Status(next)]
    }
}

/// Drives the state machine against a real transport, forever.
pub struct LiveFeedSubscriber {
    transport: Arc<dyn FeedTransport>,
    machine: FeedStateMachine,
    updates: mpsc::Sender<DashboardUpdate>,
}

impl LiveFeedSubscriber {
    pub fn new(
        transport: Arc<dyn FeedTransport>,
        backoff: Duration,
        updates: mpsc::Sender<DashboardUpdate>,
    ) -> Self {
        Self {
            transport,
            machine: FeedStateMachine::new(backoff),
            updates,
        }
    }

    /// Only returns once the dashboard has stopped listening.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let effects = self.machine.begin_connect();
            let mut reconnect_after = self.dispatch(effects).await?;

            let mut events = self.transport.open();
            while self.machine.state() != FeedStatus::Disconnected {
                let event = events.next().await.unwrap_or_else(|| TransportEvent::Closed {
                    code: None,
                    reason: "transport stream ended".to_string(),
                });
                let effects = self.machine.on_event(event);
                reconnect_after = self.dispatch(effects).await?.or(reconnect_after);
            }
            drop(events);

            if let Some(delay) = reconnect_after {
                tracing::info!("Reconnecting live feed in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn dispatch(&self, effects: Vec<FeedEffect>) -> anyhow::Result<Option<Duration>> {
        let mut reconnect_after = None;
        for effect in effects {
            let update = match effect {
                FeedEffect::Status(status) => DashboardUpdate::Status(status),
                FeedEffect::Deliver(reading) => DashboardUpdate::Reading(reading),
                FeedEffect::Reconnect(delay) => {
                    reconnect_after = Some(delay);
                    continue;
                }
            };
            self.updates
                .send(update)
                .await
                .map_err(|_| anyhow::anyhow!("dashboard is no longer receiving updates"))?;
        }
        Ok(reconnect_after)
    }
}
