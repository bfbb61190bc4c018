// Source repository trait for the recorded inputs
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source {0} not found")]
    NotFound(String),

    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {name} failed: {source}")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {name} returned status {status}")]
    Status { name: String, status: u16 },
}

#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Tabular telemetry text (header row + data rows)
    async fn fetch_records(&self) -> Result<String, SourceError>;

    /// Line-oriented timeline markup
    async fn fetch_timeline(&self) -> Result<String, SourceError>;

    /// Geographic markup holding the flight path coordinates
    async fn fetch_path(&self) -> Result<String, SourceError>;

    /// Mishap brief markdown carrying the tower weather table
    async fn fetch_weather(&self) -> Result<String, SourceError> {
        Err(SourceError::NotFound("weather".to_string()))
    }
}
