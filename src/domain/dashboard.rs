// Dashboard domain model
use super::reading::Reading;
use super::telemetry::{ChartData, ReadingView};
use super::window::BoundedWindow;
use serde::Serialize;

/// Connection status of the live feed as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// What an append pushed out of each window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eviction {
    pub chart: Option<Reading>,
    pub table: Option<Reading>,
}

/// The chart and table windows. Each evicts independently.
#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    chart: BoundedWindow<Reading>,
    table: BoundedWindow<Reading>,
}

impl DisplayBuffer {
    pub fn new(chart_capacity: usize, table_capacity: usize) -> Self {
        Self {
            chart: BoundedWindow::new(chart_capacity),
            table: BoundedWindow::new(table_capacity),
        }
    }

    pub fn chart(&self) -> &BoundedWindow<Reading> {
        &self.chart
    }

    pub fn table(&self) -> &BoundedWindow<Reading> {
        &self.table
    }

    /// Replace both windows wholesale; each keeps the tail that fits.
    pub fn seed(&mut self, readings: Vec<Reading>) {
        self.table.replace(readings.iter().cloned());
        self.chart.replace(readings);
    }

    pub fn append(&mut self, reading: Reading) -> Eviction {
        Eviction {
            table: self.table.push(reading.clone()),
            chart: self.chart.push(reading),
        }
    }
}

/// Everything a freshly connected client needs to draw the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Revision of the last change folded into this snapshot.
    pub seq: u64,
    pub status: FeedStatus,
    pub live: Option<ReadingView>,
    pub charts: Vec<ChartData>,
    pub rows: Vec<ReadingView>,
}
