use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{HealthStatus, QueryRequest, QueryResult},
    error::ErrorBody,
};
use tracing::{debug, warn};

pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod view;

pub use config::{load_settings, ClientSettings};
pub use error::QueryError;
pub use format::{format_answer, plain_text, SafeMarkup};
pub use session::{PendingQuery, QueryCompletion, QuerySession, SessionState};

const QUERY_PATH: &str = "/api/query";
const COLLECTION_STATS_PATH: &str = "/api/collection/stats";
const HEALTH_PATH: &str = "/health";

/// The legal RAG service as seen by the client.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn query(&self, request: QueryRequest) -> Result<QueryResult, QueryError>;
    /// Raw collection statistics; the client does not interpret them.
    async fn collection_stats(&self) -> Result<Value, QueryError>;
    async fn health(&self) -> Result<HealthStatus, QueryError>;
}

pub struct HttpQueryBackend {
    http: Client,
    base_url: String,
}

impl HttpQueryBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::with_timeout(settings.api_url.clone(), settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl QueryBackend for HttpQueryBackend {
    async fn query(&self, request: QueryRequest) -> Result<QueryResult, QueryError> {
        let url = self.endpoint(QUERY_PATH);
        debug!(%url, "posting legal query");
        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(QueryError::from_transport)?;
        decode_json(response).await
    }

    async fn collection_stats(&self) -> Result<Value, QueryError> {
        let response = self
            .http
            .get(self.endpoint(COLLECTION_STATS_PATH))
            .send()
            .await
            .map_err(QueryError::from_transport)?;
        decode_json(response).await
    }

    async fn health(&self) -> Result<HealthStatus, QueryError> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(QueryError::from_transport)?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, QueryError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(QueryError::from_transport)?;

    if !status.is_success() {
        let detail = ErrorBody::from_slice(&body)
            .and_then(|body| body.message().map(str::to_owned));
        warn!(status = status.as_u16(), detail = ?detail, "backend returned an error status");
        return Err(QueryError::Server {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|err| {
        warn!(status = status.as_u16(), error = %err, "backend response did not match the expected shape");
        QueryError::Shape(err.to_string())
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
