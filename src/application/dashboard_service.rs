// Dashboard service - Owns the display windows and feeds the presentation sink
use crate::application::presentation_sink::{PresentationSink, SequencedEvent, SinkEvent};
use crate::domain::dashboard::{DashboardSnapshot, DisplayBuffer, FeedStatus};
use crate::domain::reading::Reading;
use crate::domain::telemetry::{ChartData, Measurement, ReadingView};
use crate::domain::timestamp::DisplayClock;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Inputs from the historical loader and the live feed.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    Seed(Vec<Reading>),
    Reading(Reading),
    Status(FeedStatus),
}

pub struct DashboardService {
    seq: u64,
    buffer: DisplayBuffer,
    clock: DisplayClock,
    status: FeedStatus,
    live: Option<ReadingView>,
    sink: Arc<dyn PresentationSink>,
    snapshots: watch::Sender<DashboardSnapshot>,
}

impl DashboardService {
    pub fn new(
        buffer: DisplayBuffer,
        clock: DisplayClock,
        sink: Arc<dyn PresentationSink>,
    ) -> (Self, watch::Receiver<DashboardSnapshot>) {
        let (snapshots, rx) = watch::channel(DashboardSnapshot::default());
        let service = Self {
            seq: 0,
            buffer,
            clock,
            status: FeedStatus::Disconnected,
            live: None,
            sink,
            snapshots,
        };
        service.snapshots.send_replace(service.snapshot());
        (service, rx)
    }

    /// Process updates in arrival order until every sender is gone.
    pub async fn run(mut self, mut updates: mpsc::Receiver<DashboardUpdate>) {
        while let Some(update) = updates.recv().await {
            self.apply(update);
        }
        tracing::info!("Dashboard update channel closed");
    }

    pub fn apply(&mut self, update: DashboardUpdate) {
        let event = match update {
            DashboardUpdate::Seed(readings) => {
                self.buffer.seed(readings);
                tracing::info!(
                    "Seeded dashboard: chart {}/{}, table {}/{}",
                    self.buffer.chart().len(),
                    self.buffer.chart().capacity(),
                    self.buffer.table().len(),
                    self.buffer.table().capacity()
                );
                SinkEvent::Seeded {
                    charts: self.charts(),
                    rows: self.rows(),
                }
            }
            DashboardUpdate::Reading(reading) => {
                if self.buffer.chart().is_empty() {
                    tracing::debug!("Live reading arrived before any history");
                }
                let view = ReadingView::new(&reading, &self.clock);
                let eviction = self.buffer.append(reading);
                self.live = Some(view.clone());
                SinkEvent::Appended {
                    reading: view,
                    chart_evicted: eviction.chart.is_some(),
                    table_evicted: eviction.table.is_some(),
                }
            }
            DashboardUpdate::Status(status) => {
                self.status = status;
                SinkEvent::Status { status }
            }
        };

        // A delta is never broadcast before the snapshot that contains it.
        self.seq += 1;
        self.snapshots.send_replace(self.snapshot());
        self.sink.render(&SequencedEvent {
            seq: self.seq,
            event,
        });
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            seq: self.seq,
            status: self.status,
            live: self.live.clone(),
            charts: self.charts(),
            rows: self.rows(),
        }
    }

    fn charts(&self) -> Vec<ChartData> {
        Measurement::ALL
            .iter()
            .map(|m| m.chart(self.buffer.chart().iter(), &self.clock))
            .collect()
    }

    fn rows(&self) -> Vec<ReadingView> {
        self.buffer
            .table()
            .iter()
            .map(|r| ReadingView::new(r, &self.clock))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::Severity;
    use crate::domain::reading::sample;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<SinkEvent>>,
        seqs: Mutex<Vec<u64>>,
    }

    impl PresentationSink for RecordingSink {
        fn render(&self, event: &SequencedEvent) {
            self.events.lock().unwrap().push(event.event.clone());
            self.seqs.lock().unwrap().push(event.seq);
        }
    }

    fn service(
        chart: usize,
        table: usize,
    ) -> (DashboardService, watch::Receiver<DashboardSnapshot>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let (service, rx) = DashboardService::new(
            DisplayBuffer::new(chart, table),
            DisplayClock::new(chrono_tz::America::Lima),
            sink.clone(),
        );
        (service, rx, sink)
    }

    #[test]
    fn test_initial_snapshot_is_empty_and_disconnected() {
        let (_service, rx, _) = service(50, 20);
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.status, FeedStatus::Disconnected);
        assert!(snapshot.live.is_none());
        assert!(snapshot.rows.is_empty());
        assert_eq!(snapshot.charts.len(), 2);
        assert!(snapshot.charts.iter().all(|c| c.series.points.is_empty()));
    }

    #[test]
    fn test_seed_renders_full_replacement() {
        let (mut service, rx, sink) = service(50, 2);
        service.apply(DashboardUpdate::Seed(vec![
            sample(1, 5.0, 50.0),
            sample(2, 50.0, 150.0),
            sample(3, 90.0, 700.0),
        ]));

        let events = sink.events.lock().unwrap();
        match &events[0] {
            SinkEvent::Seeded { charts, rows } => {
                assert_eq!(charts[0].series.points.len(), 3);
                let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
                assert_eq!(ids, vec!["2", "3"]);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.rows.len(), 2);
        assert!(snapshot.live.is_none());
    }

    #[test]
    fn test_live_reading_updates_readout_and_reports_evictions() {
        let (mut service, rx, sink) = service(3, 2);
        service.apply(DashboardUpdate::Seed(vec![
            sample(1, 5.0, 50.0),
            sample(2, 50.0, 150.0),
        ]));
        service.apply(DashboardUpdate::Reading(sample(3, 95.0, 650.0)));

        let events = sink.events.lock().unwrap();
        assert_eq!(
            events.last(),
            Some(&SinkEvent::Appended {
                reading: ReadingView::new(
                    &sample(3, 95.0, 650.0),
                    &DisplayClock::new(chrono_tz::America::Lima)
                ),
                chart_evicted: false,
                table_evicted: true,
            })
        );

        let snapshot = rx.borrow().clone();
        let live = snapshot.live.expect("live readout");
        assert_eq!(live.turbidity.severity, Severity::Alert);
        assert_eq!(live.tds.severity, Severity::Alert);
        let ids: Vec<&str> = snapshot.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(snapshot.charts[0].series.points.len(), 3);
    }

    #[test]
    fn test_status_changes_are_forwarded() {
        let (mut service, rx, sink) = service(50, 20);
        service.apply(DashboardUpdate::Status(FeedStatus::Connecting));
        service.apply(DashboardUpdate::Status(FeedStatus::Connected));

        assert_eq!(rx.borrow().status, FeedStatus::Connected);
        assert_eq!(
            *sink.events.lock().unwrap(),
            vec![
                SinkEvent::Status { status: FeedStatus::Connecting },
                SinkEvent::Status { status: FeedStatus::Connected },
            ]
        );
    }

    #[test]
    fn test_each_change_advances_the_snapshot_revision() {
        let (mut service, rx, sink) = service(50, 20);
        assert_eq!(rx.borrow().seq, 0);

        service.apply(DashboardUpdate::Status(FeedStatus::Connecting));
        service.apply(DashboardUpdate::Seed(vec![sample(1, 1.0, 1.0)]));
        service.apply(DashboardUpdate::Reading(sample(2, 2.0, 2.0)));

        assert_eq!(*sink.seqs.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(rx.borrow().seq, 3);
    }

    #[tokio::test]
    async fn test_run_processes_updates_in_order() {
        let (service, rx, sink) = service(50, 20);
        let (tx, updates) = mpsc::channel(8);
        tx.send(DashboardUpdate::Status(FeedStatus::Connected)).await.unwrap();
        tx.send(DashboardUpdate::Reading(sample(1, 1.0, 1.0))).await.unwrap();
        drop(tx);

        service.run(updates).await;

        assert_eq!(sink.events.lock().unwrap().len(), 2);
        assert_eq!(rx.borrow().rows.len(), 1);
    }
}
