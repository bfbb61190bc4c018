// HTTP source repository - fetches the recording from a static file host
use crate::application::source_repository::{SourceError, SourceRepository};
use crate::infrastructure::config::SourceSettings;
use async_trait::async_trait;
use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub struct HttpSourceRepository {
    client: reqwest::Client,
    base_url: String,
    records: String,
    timeline: String,
    path: String,
    weather: String,
}

impl HttpSourceRepository {
    pub fn new(settings: &SourceSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base.trim_end_matches('/').to_string(),
            records: settings.records.clone(),
            timeline: settings.timeline.clone(),
            path: settings.path.clone(),
            weather: settings.weather.clone(),
        }
    }

    fn build_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(name))
    }

    async fn fetch(&self, name: &str) -> Result<String, SourceError> {
        let url = self.build_url(name);
        tracing::debug!("Fetching source {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                name: name.to_string(),
                source: e,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| SourceError::Http {
            name: name.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl SourceRepository for HttpSourceRepository {
    async fn fetch_records(&self) -> Result<String, SourceError> {
        self.fetch(&self.records).await
    }

    async fn fetch_timeline(&self) -> Result<String, SourceError> {
        self.fetch(&self.timeline).await
    }

    async fn fetch_path(&self) -> Result<String, SourceError> {
        self.fetch(&self.path).await
    }

    async fn fetch_weather(&self) -> Result<String, SourceError> {
        self.fetch(&self.weather).await
    }
}
