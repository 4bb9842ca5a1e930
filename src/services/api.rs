use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::ApiSettings;
use crate::models::{CurrentUser, PreferenceWrite, Student};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when talking to the TWIN API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unauthorized: session missing or expired")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// The four calls the preference page makes against the server
#[async_trait]
pub trait TwinApi: Send + Sync {
    /// `GET /api/students`
    async fn fetch_students(&self) -> Result<Vec<Student>, ApiError>;

    /// `GET /api/user`
    async fn fetch_user(&self) -> Result<CurrentUser, ApiError>;

    /// `GET /api/preference`, `None` when no preference is stored
    async fn fetch_preference(&self) -> Result<Option<Student>, ApiError>;

    /// `POST /api/preference`, returns the preference the server now holds
    async fn save_preference(&self, write: &PreferenceWrite) -> Result<Option<Student>, ApiError>;
}

/// TWIN API client over HTTP
///
/// Forwards an opaque Django session cookie when one is configured and tags
/// each request with an `X-Request-Id` for correlation in server logs.
pub struct HttpTwinApi {
    base_url: String,
    session_id: Option<String>,
    client: Client,
}

impl HttpTwinApi {
    /// Create a new client
    pub fn new(
        base_url: String,
        session_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id,
            client,
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::new(
            settings.base_url.clone(),
            settings.session_id.clone(),
            Duration::from_secs(settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::debug!("{} {} (request {})", method, url, request_id);

        let mut builder = self
            .client
            .request(method, &url)
            .header("X-Request-Id", request_id);

        if let Some(session_id) = &self.session_id {
            builder = builder.header(reqwest::header::COOKIE, format!("sessionid={}", session_id));
        }

        builder
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("TWIN API returned {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{} (body: {})", e, body)))
    }
}

#[async_trait]
impl TwinApi for HttpTwinApi {
    async fn fetch_students(&self) -> Result<Vec<Student>, ApiError> {
        let response = self.request(Method::GET, "/api/students").send().await?;
        let students: Vec<Student> = Self::read_json(response).await?;

        tracing::debug!("Fetched {} students", students.len());
        Ok(students)
    }

    async fn fetch_user(&self) -> Result<CurrentUser, ApiError> {
        let response = self.request(Method::GET, "/api/user").send().await?;
        Self::read_json(response).await
    }

    async fn fetch_preference(&self) -> Result<Option<Student>, ApiError> {
        let response = self.request(Method::GET, "/api/preference").send().await?;
        Self::read_json(response).await
    }

    async fn save_preference(&self, write: &PreferenceWrite) -> Result<Option<Student>, ApiError> {
        let response = self
            .request(Method::POST, "/api/preference")
            .json(write)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = HttpTwinApi::new(
            "https://twin.test/".to_string(),
            Some("abc".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url(), "https://twin.test");
        assert_eq!(client.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_from_settings_uses_default_timeout() {
        let settings = ApiSettings {
            base_url: "http://localhost:8000".to_string(),
            session_id: None,
            timeout_secs: None,
        };

        let client = HttpTwinApi::from_settings(&settings).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
