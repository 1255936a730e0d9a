use serde::{Deserialize, Serialize};
use url::Url;

/// Base URL used when running against a local backend
const DEV_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Response from the /health endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response from the /validate endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(default)]
    pub video_info: Option<VideoInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<MediaFormat>,
}

/// One downloadable format as described by the backend.
/// The backend does not guarantee a format id; consumers fall back to "best".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaFormat {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub filesize: Option<u64>,
}

/// Body of the /download request. `format_id` serializes as JSON null
/// in audio-only mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: Option<String>,
    pub audio_only: bool,
}

/// Response from the /download endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadResponse {
    pub status: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl DownloadResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEV_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve the API base URL from the origin the frontend is served from.
    /// Local or unparseable origins map to the fixed development backend,
    /// anything else gets `/api` appended to the origin itself.
    pub fn for_origin(origin: &str) -> Self {
        let host = Url::parse(origin)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));

        match host.as_deref() {
            None | Some("") | Some("localhost") | Some("127.0.0.1") => Self::default(),
            Some(_) => Self {
                base_url: format!("{}/api", origin.trim_end_matches('/')),
            },
        }
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    /// Absolute URL for a server-relative download path. Files are served
    /// from the origin, not under the `/api` prefix.
    pub fn file_url(&self, download_url: &str) -> String {
        let origin = self
            .base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url);
        format!("{}{}", origin, download_url)
    }
}
