//! HTTP client for the Query Service REST surface.

use coursegraph_core::{CourseCode, CourseDetail, CourseSummary, WebConfig};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", describe_status(.status, .message))]
    Status { status: u16, message: Option<String> },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("received details for {received} while loading {requested}")]
    Stale { requested: String, received: String },
}

impl FetchError {
    /// The `message` or `error` field of a failed response body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Request failed with status code {status}"),
    }
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(config: &WebConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_courses(&self) -> Result<Vec<CourseSummary>, FetchError> {
        let url = self.endpoint(&["courses"])?;
        debug!(%url, "fetching course list");
        let response = error_for_status(self.http.get(url).send().await?).await?;
        response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Detail of one course. `None` when the service does not know the code,
    /// either as a 404 or as an empty detail.
    pub async fn get_course(&self, code: &CourseCode) -> Result<Option<CourseDetail>, FetchError> {
        let url = self.endpoint(&["courses", code.as_str()])?;
        debug!(%url, "fetching course detail");
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let detail: CourseDetail = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(detail.course.is_some().then_some(detail))
    }
}

async fn error_for_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body).ok().and_then(|body| {
        ["message", "error"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_owned))
    });
    warn!(status = status.as_u16(), ?message, "catalog request failed");
    Err(FetchError::Status {
        status: status.as_u16(),
        message,
    })
}
