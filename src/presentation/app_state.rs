// Application state for HTTP handlers
use crate::application::presentation_sink::SequencedEvent;
use crate::domain::dashboard::DashboardSnapshot;
use tokio::sync::{broadcast, watch};

#[derive(Clone)]
pub struct AppState {
    pub snapshots: watch::Receiver<DashboardSnapshot>,
    pub events: broadcast::Sender<SequencedEvent>,
}
