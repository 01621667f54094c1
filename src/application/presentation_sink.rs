// Port for whatever draws the dashboard
use crate::domain::dashboard::FeedStatus;
use crate::domain::telemetry::{ChartData, ReadingView};
use serde::Serialize;

/// Events pushed to the presentation layer, each carrying just the delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkEvent {
    Seeded {
        charts: Vec<ChartData>,
        rows: Vec<ReadingView>,
    },
    Appended {
        reading: ReadingView,
        chart_evicted: bool,
        table_evicted: bool,
    },
    Status {
        status: FeedStatus,
    },
}

impl SinkEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SinkEvent::Seeded { .. } => "seeded",
            SinkEvent::Appended { .. } => "appended",
            SinkEvent::Status { .. } => "status",
        }
    }
}

/// A sink event stamped with the dashboard revision it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencedEvent {
    pub seq: u64,
    #[serde(flatten)]
    pub event: SinkEvent,
}

pub trait PresentationSink: Send + Sync {
    fn render(&self, event: &SequencedEvent);
}
