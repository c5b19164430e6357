use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::ResearchError;
use crate::models::{ResearchRequest, ResearchResult, ServiceStatus};

const BUYERS_PATH: &str = "/api/research/buyers";
const STATUS_PATH: &str = "/api/research/status";

/// The remote research collaborator.
///
/// Production code talks to [`HttpResearchService`]; tests substitute
/// scripted stubs, and [`CachedResearchService`](crate::cache::CachedResearchService)
/// wraps any implementation with a TTL cache.
#[async_trait]
pub trait ResearchService: Send + Sync {
    /// Run one buyer-discovery query.
    async fn discover_buyers(
        &self,
        request: &ResearchRequest,
    ) -> Result<ResearchResult, ResearchError>;

    /// Development probe reporting whether the service runs in mock or live
    /// mode. Nothing in the request lifecycle depends on it.
    async fn status(&self) -> Result<ServiceStatus, ResearchError>;
}

/// Error body the research service sends on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// HTTP client for the research service contract.
pub struct HttpResearchService {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpResearchService {
    /// Build a client against a service root such as `http://localhost:8000`.
    /// Endpoint paths are joined from that root.
    pub fn new(base_url: &str) -> Result<Self, ResearchError> {
        Self::with_timeout(base_url, None)
    }

    /// Build a client with a per-request timeout. `None` leaves the
    /// transport default in place.
    pub fn with_timeout(
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ResearchError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            ResearchError::InvalidInput(format!("invalid research service URL: {e}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ResearchError::InvalidInput(format!(
                "research service URL must be http(s), got '{}'",
                base_url.scheme()
            )));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ResearchError::Transport(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ResearchError> {
        self.base_url.join(path).map_err(|e| {
            ResearchError::InvalidInput(format!("invalid research service URL: {e}"))
        })
    }
}

#[async_trait]
impl ResearchService for HttpResearchService {
    async fn discover_buyers(
        &self,
        request: &ResearchRequest,
    ) -> Result<ResearchResult, ResearchError> {
        let url = self.endpoint(BUYERS_PATH)?;
        debug!(company = %request.company_name, "posting buyer-discovery request");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ResearchError::Transport(e.to_string()))?;
        let response = into_success(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ResearchError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ResearchError::MalformedResponse(e.to_string()))
    }

    async fn status(&self) -> Result<ServiceStatus, ResearchError> {
        let url = self.endpoint(STATUS_PATH)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ResearchError::Transport(e.to_string()))?;
        let response = into_success(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ResearchError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ResearchError::MalformedResponse(e.to_string()))
    }
}

/// Turn a non-2xx response into `Transport`, preferring the server's
/// `detail` message over the bare status line.
async fn into_success(response: reqwest::Response) -> Result<reqwest::Response, ResearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .filter(|d| !d.trim().is_empty());
    Err(ResearchError::Transport(
        detail.unwrap_or_else(|| status_line(status)),
    ))
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_from_the_service_root() {
        let client = HttpResearchService::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint(BUYERS_PATH).unwrap().as_str(),
            "http://localhost:8000/api/research/buyers"
        );
        assert_eq!(
            client.endpoint(STATUS_PATH).unwrap().as_str(),
            "http://localhost:8000/api/research/status"
        );
    }

    #[test]
    fn malformed_base_url_is_rejected_at_construction() {
        assert!(matches!(
            HttpResearchService::new("http://"),
            Err(ResearchError::InvalidInput(_))
        ));
        // a missing scheme parses as scheme "localhost", catch it explicitly
        assert!(matches!(
            HttpResearchService::new("localhost:8000"),
            Err(ResearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn status_line_includes_the_reason_phrase() {
        assert_eq!(
            status_line(StatusCode::TOO_MANY_REQUESTS),
            "429 Too Many Requests"
        );
        assert_eq!(
            status_line(StatusCode::SERVICE_UNAVAILABLE),
            "503 Service Unavailable"
        );
    }
}
