// Presentation layer - HTTP surface and the sink that feeds it
pub mod app_state;
pub mod broadcast_sink;
pub mod handlers;
