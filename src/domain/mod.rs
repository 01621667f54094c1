// Domain layer - Readings, classification and display windows
pub mod classification;
pub mod dashboard;
pub mod reading;
pub mod telemetry;
pub mod timestamp;
pub mod window;
