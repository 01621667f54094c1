// Application layer - Use cases and the ports they depend on
pub mod dashboard_service;
pub mod historical_loader;
pub mod live_feed;
pub mod presentation_sink;
pub mod telemetry_source;
