use reqwest::Client;
use thiserror::Error;

use super::models::{
    ApiConfig, DownloadRequest, DownloadResponse, HealthResponse, ValidationResponse,
};
use crate::domain::AppError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fire-and-forget health probe issued on startup
    pub async fn check_health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.config.health_url())
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Api(format!("Health check failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Ask the backend whether a URL is downloadable and fetch its metadata
    pub async fn validate_url(&self, url: &str) -> Result<ValidationResponse> {
        let response = self
            .http
            .post(format!("{}/validate", self.config.base_url))
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Api(format!("Validate request failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Start a download on the backend. The backend reports rejections in the
    /// response body rather than the HTTP status, so the status line is not
    /// checked here.
    pub async fn request_download(&self, request: &DownloadRequest) -> Result<DownloadResponse> {
        let response = self
            .http
            .post(format!("{}/download", self.config.base_url))
            .json(request)
            .send()
            .await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Retrieve a finished file from its absolute URL
    pub async fn fetch_file(&self, file_url: &str) -> Result<bytes::Bytes> {
        let response = self
            .http
            .get(file_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Api(format!("File request failed: {}", e)))?;

        Ok(response.bytes().await?)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) if e.is_connect() || e.is_timeout() => AppError::Unreachable,
            other => AppError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: format!("{}/api", server.url()),
        })
    }

    #[tokio::test]
    async fn test_check_health() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/health")
            .with_body(r#"{"status": "healthy"}"#)
            .create_async()
            .await;

        let health = client_for(&server).check_health().await.unwrap();
        assert_eq!(health.status, "healthy");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_validate_url_decodes_metadata() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/validate")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "url": "https://example.com/watch?v=1"
            })))
            .with_body(
                r#"{
                    "valid": true,
                    "video_info": {
                        "title": "T",
                        "duration": 125,
                        "formats": [
                            {"format_id": "18", "resolution": "360p", "filesize": 1048576}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let response = client_for(&server)
            .validate_url("https://example.com/watch?v=1")
            .await
            .unwrap();

        assert!(response.valid);
        let info = response.video_info.unwrap();
        assert_eq!(info.title.as_deref(), Some("T"));
        assert_eq!(info.duration, Some(125));
        assert_eq!(info.formats.len(), 1);
        assert_eq!(info.formats[0].format_id.as_deref(), Some("18"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_validate_url_non_2xx_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/validate")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server)
            .validate_url("https://example.com/watch?v=1")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Api(_)));
    }

    #[tokio::test]
    async fn test_request_download_reads_body_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/download")
            .with_status(400)
            .with_body(r#"{"status": "error", "message": "unsupported site"}"#)
            .create_async()
            .await;

        let request = DownloadRequest {
            url: "https://example.com/watch?v=1".to_string(),
            format_id: Some("18".to_string()),
            audio_only: false,
        };
        let response = client_for(&server)
            .request_download(&request)
            .await
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.message.as_deref(), Some("unsupported site"));
    }

    #[tokio::test]
    async fn test_connect_failure_maps_to_unreachable() {
        // Nothing listens on port 1
        let client = ApiClient::new(ApiConfig {
            base_url: "http://127.0.0.1:1/api".to_string(),
        });

        let err = client
            .validate_url("https://example.com/watch?v=1")
            .await
            .unwrap_err();

        assert!(matches!(AppError::from(err), AppError::Unreachable));
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/files/v.mp4")
            .with_body("bytes")
            .create_async()
            .await;

        let client = client_for(&server);
        let url = client.config().file_url("/files/v.mp4");
        let body = client.fetch_file(&url).await.unwrap();
        assert_eq!(&body[..], b"bytes");
    }
}
