// Presentation layer - HTTP surface and dashboard sinks
pub mod app_state;
pub mod handlers;
pub mod sinks;
