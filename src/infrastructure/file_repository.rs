// Local file source repository
use crate::application::source_repository::{SourceError, SourceRepository};
use crate::infrastructure::config::SourceSettings;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileSourceRepository {
    base: PathBuf,
    records: String,
    timeline: String,
    path: String,
    weather: String,
}

impl FileSourceRepository {
    pub fn new(settings: &SourceSettings) -> Self {
        Self {
            base: PathBuf::from(&settings.base),
            records: settings.records.clone(),
            timeline: settings.timeline.clone(),
            path: settings.path.clone(),
            weather: settings.weather.clone(),
        }
    }

    async fn read(&self, name: &str) -> Result<String, SourceError> {
        let path = self.base.join(name);
        tracing::debug!("Reading source {}", path.display());
        match tokio::fs::read(&path).await {
            // Recorder exports are not always clean UTF-8
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SourceError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(SourceError::Io {
                name: path.display().to_string(),
                source: e,
            }),
        }
    }
}

#[async_trait]
impl SourceRepository for FileSourceRepository {
    async fn fetch_records(&self) -> Result<String, SourceError> {
        self.read(&self.records).await
    }

    async fn fetch_timeline(&self) -> Result<String, SourceError> {
        self.read(&self.timeline).await
    }

    async fn fetch_path(&self) -> Result<String, SourceError> {
        self.read(&self.path).await
    }

    async fn fetch_weather(&self) -> Result<String, SourceError> {
        self.read(&self.weather).await
    }
}
