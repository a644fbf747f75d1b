use async_trait::async_trait;
use thiserror::Error;

use crate::calendar::Event;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected status {status}: {body}")]
    StatusError { status: u16, body: String },
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Source of events for a day range. `query` is `?start=..&end=..`.
/// `Ok(None)` means the source had nothing to say about the range.
#[async_trait]
pub trait RemoteEvents: Send + Sync {
    async fn fetch_events(&self, query: &str) -> Result<Option<Vec<Event>>, FetchError>;
}

pub struct HttpRemoteEvents {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteEvents {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RemoteEvents for HttpRemoteEvents {
    async fn fetch_events(&self, query: &str) -> Result<Option<Vec<Event>>, FetchError> {
        let url = format!("{}{}", self.base_url, query);

        tracing::info!("Fetching events: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        tracing::info!("Fetch events response status: {}", status);

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to fetch events. Status: {}, Body: {}", status, body);
            return Err(FetchError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let events: Option<Vec<Event>> = serde_json::from_str(&body)
            .map_err(|e| FetchError::ParseError(format!("Invalid events payload: {}", e)))?;

        tracing::info!("Fetched {} events", events.as_ref().map_or(0, Vec::len));
        Ok(events)
    }
}
