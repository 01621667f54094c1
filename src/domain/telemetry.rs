// Telemetry presentation models
use super::classification::{classify_tds, classify_turbidity, Classification};
use super::reading::Reading;
use super::timestamp::DisplayClock;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub label: String,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, label: String, value: f64) -> Self {
        Self {
            time_ms,
            label,
            value,
        }
    }
}

/// One reading as shown in the live readout and the history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingView {
    pub id: String,
    pub timestamp: String,
    pub time_label: String,
    pub turbidity_percent: f64,
    pub turbidity_text: String,
    pub turbidity: Classification,
    pub tds_ppm: f64,
    pub tds_text: String,
    pub tds: Classification,
}

impl ReadingView {
    pub fn new(reading: &Reading, clock: &DisplayClock) -> Self {
        Self {
            id: reading.id.to_string(),
            timestamp: clock.format(reading.timestamp),
            time_label: clock.time_label(reading.timestamp),
            turbidity_percent: reading.turbidity_percent,
            turbidity_text: format!("{:.1}", reading.turbidity_percent),
            turbidity: classify_turbidity(reading.turbidity_percent),
            tds_ppm: reading.tds_ppm,
            tds_text: format!("{:.2}", reading.tds_ppm),
            tds: classify_tds(reading.tds_ppm),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: i32,
    pub series: SeriesData,
}

/// Which measurement a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Turbidity,
    Tds,
}

impl Measurement {
    pub const ALL: [Measurement; 2] = [Measurement::Turbidity, Measurement::Tds];

    pub fn value(self, reading: &Reading) -> f64 {
        match self {
            Measurement::Turbidity => reading.turbidity_percent,
            Measurement::Tds => reading.tds_ppm,
        }
    }

    /// Build the chart for this measurement from readings ordered oldest first.
    pub fn chart<'a, I>(self, readings: I, clock: &DisplayClock) -> ChartData
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let points = readings
            .into_iter()
            .map(|r| {
                TimeSeriesPoint::new(
                    r.timestamp.timestamp_millis(),
                    clock.time_label(r.timestamp),
                    self.value(r),
                )
            })
            .collect();

        match self {
            Measurement::Turbidity => ChartData {
                id: "turbidity".to_string(),
                title: "Turbidity History".to_string(),
                unit: "%".to_string(),
                y_min: Some(0.0),
                y_max: Some(100.0),
                fraction_digits: 1,
                series: SeriesData {
                    id: "turbidity".to_string(),
                    name: "Turbidity (%)".to_string(),
                    color: Some("#0056b3".to_string()),
                    points,
                },
            },
            Measurement::Tds => ChartData {
                id: "tds".to_string(),
                title: "TDS History".to_string(),
                unit: "ppm".to_string(),
                y_min: Some(0.0),
                y_max: None,
                fraction_digits: 2,
                series: SeriesData {
                    id: "tds".to_string(),
                    name: "TDS (ppm)".to_string(),
                    color: Some("#28a745".to_string()),
                    points,
                },
            },
        }
    }
}
