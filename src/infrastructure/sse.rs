// Server-Sent Events stream of dashboard changes
use crate::application::presentation_sink::SequencedEvent;
use crate::domain::dashboard::DashboardSnapshot;
use axum::response::sse::Event;
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// What a client is sent, before SSE encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardFrame {
    Snapshot(DashboardSnapshot),
    Delta(SequencedEvent),
}

/// Current snapshot first, then every delta newer than what the client already has.
/// A client that falls behind the broadcast buffer is resynced with a fresh snapshot;
/// deltas already folded into a snapshot are skipped.
pub fn dashboard_frames(
    snapshots: watch::Receiver<DashboardSnapshot>,
    events: broadcast::Receiver<SequencedEvent>,
) -> impl Stream<Item = DashboardFrame> + Send + 'static {
    async_stream::stream! {
        let snapshot = snapshots.borrow().clone();
        let mut applied = snapshot.seq;
        yield DashboardFrame::Snapshot(snapshot);

        let mut deltas = BroadcastStream::new(events);
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(event) if event.seq <= applied => {
                    tracing::trace!(seq = event.seq, "Skipping delta already in snapshot");
                }
                Ok(event) => {
                    applied = event.seq;
                    yield DashboardFrame::Delta(event);
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!("SSE client lagged by {} events, resending snapshot", skipped);
                    let snapshot = snapshots.borrow().clone();
                    applied = snapshot.seq;
                    yield DashboardFrame::Snapshot(snapshot);
                }
            }
        }
    }
}

fn encode(frame: DashboardFrame) -> Result<Event, axum::Error> {
    match frame {
        DashboardFrame::Snapshot(snapshot) => {
            Event::default().event("snapshot").json_data(snapshot)
        }
        DashboardFrame::Delta(delta) => Event::default()
            .event(delta.event.name())
            .id(delta.seq.to_string())
            .json_data(&delta),
    }
}

pub fn dashboard_events(
    snapshots: watch::Receiver<DashboardSnapshot>,
    events: broadcast::Receiver<SequencedEvent>,
) -> impl Stream<Item = Result<Event, axum::Error>> + Send + 'static {
    dashboard_frames(snapshots, events).map(encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::presentation_sink::SinkEvent;
    use crate::domain::dashboard::FeedStatus;
    use futures::FutureExt;

    fn status(seq: u64) -> SequencedEvent {
        SequencedEvent {
            seq,
            event: SinkEvent::Status {
                status: FeedStatus::Connected,
            },
        }
    }

    fn snapshot(seq: u64) -> DashboardSnapshot {
        DashboardSnapshot {
            seq,
            ..Default::default()
        }
    }

    fn seqs(frames: &[DashboardFrame]) -> Vec<(&'static str, u64)> {
        frames
            .iter()
            .map(|f| match f {
                DashboardFrame::Snapshot(s) => ("snapshot", s.seq),
                DashboardFrame::Delta(d) => ("delta", d.seq),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_lagging_client_is_resynced_without_replaying_stale_deltas() {
        let (_snapshot_tx, snapshots) = watch::channel(snapshot(5));
        let (tx, rx) = broadcast::channel(2);
        for seq in 1..=5 {
            tx.send(status(seq)).unwrap();
        }
        drop(tx);

        let frames: Vec<DashboardFrame> = dashboard_frames(snapshots, rx).collect().await;

        assert_eq!(seqs(&frames), vec![("snapshot", 5), ("snapshot", 5)]);
    }

    #[tokio::test]
    async fn test_deltas_queued_before_first_snapshot_are_skipped() {
        let (_snapshot_tx, snapshots) = watch::channel(snapshot(3));
        let (tx, rx) = broadcast::channel(16);
        tx.send(status(2)).unwrap();
        tx.send(status(3)).unwrap();
        tx.send(status(4)).unwrap();
        drop(tx);

        let frames: Vec<DashboardFrame> = dashboard_frames(snapshots, rx).collect().await;

        assert_eq!(seqs(&frames), vec![("snapshot", 3), ("delta", 4)]);
    }

    #[tokio::test]
    async fn test_resync_resumes_with_newer_deltas() {
        let (snapshot_tx, snapshots) = watch::channel(snapshot(0));
        let (tx, rx) = broadcast::channel(2);
        let mut frames = Box::pin(dashboard_frames(snapshots, rx));
        assert_eq!(
            frames.next().await,
            Some(DashboardFrame::Snapshot(snapshot(0)))
        );

        for seq in 1..=4 {
            snapshot_tx.send_replace(snapshot(seq));
            tx.send(status(seq)).unwrap();
        }
        assert_eq!(
            frames.next().await,
            Some(DashboardFrame::Snapshot(snapshot(4)))
        );

        // drains the deltas already covered by the resync snapshot
        assert_eq!(frames.next().now_or_never(), None);

        snapshot_tx.send_replace(snapshot(5));
        tx.send(status(5)).unwrap();
        drop(tx);

        let rest: Vec<DashboardFrame> = frames.collect().await;
        assert_eq!(seqs(&rest), vec![("delta", 5)]);
    }
}
