// Infrastructure layer - Source loading, parsers, config and wire encoding
pub mod chunked_json;
pub mod config;
pub mod file_repository;
pub mod http_repository;
pub mod http_response;
pub mod kml;
pub mod parse_outcome;
pub mod telemetry_csv;
pub mod timeline_markup;
pub mod weather_table;
