// Presentation sink fanning dashboard events out to connected clients
use crate::application::presentation_sink::{PresentationSink, SequencedEvent, SinkEvent};
use tokio::sync::broadcast;

pub struct BroadcastSink {
    events: broadcast::Sender<SequencedEvent>,
}

impl BroadcastSink {
    pub fn new(events: broadcast::Sender<SequencedEvent>) -> Self {
        Self { events }
    }
}

impl PresentationSink for BroadcastSink {
    fn render(&self, event: &SequencedEvent) {
        match &event.event {
            SinkEvent::Status { status } => {
                tracing::info!(?status, "Live feed status changed")
            }
            SinkEvent::Seeded { rows, .. } => {
                tracing::debug!("Rendering {} seeded rows", rows.len())
            }
            SinkEvent::Appended { reading, .. } => {
                tracing::debug!(id = %reading.id, "Rendering live reading")
            }
        }

        // No subscribers simply means nobody is watching yet.
        let _ = self.events.send(event.clone());
    }
}
