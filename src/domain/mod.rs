// Domain layer - Plain data types shared by every other layer
pub mod dashboard;
pub mod flight_path;
pub mod metrics;
pub mod playback;
pub mod telemetry;
pub mod time_axis;
pub mod timeline;
pub mod weather;
