use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt};
use rand::Rng;

use crate::{
    api::models::{
        ApiConfig, DownloadRequest, DownloadResponse, MediaFormat, ValidationResponse, VideoInfo,
    },
    domain::{AppError, DownloadMode, FormatOption, Phase, SaveAction},
    utils::{format_duration, format_file_size},
};

/// The simulated progress bar stalls here; only the completed download
/// attempt moves it to 100%.
pub const PROGRESS_CEILING: f32 = 95.0;
pub const PROGRESS_TICK: Duration = Duration::from_millis(200);
/// Fixed pause between the backend accepting a download and the UI
/// reporting it complete.
pub const SUCCESS_DELAY: Duration = Duration::from_secs(2);

const FALLBACK_FORMAT_ID: &str = "best";

/// The most recently validated URL and its metadata. Overwritten by each
/// successful validation, never explicitly cleared otherwise.
#[derive(Debug, Clone)]
struct Session {
    url: String,
    video_info: Option<VideoInfo>,
}

/// State machine coordinating URL validation, format selection and download
/// initiation. Holds no handle to the UI toolkit; the app layer feeds it
/// request outcomes and renders from its accessors.
pub struct Orchestrator {
    config: ApiConfig,
    session: Option<Session>,
    phase: Phase,
    status_message: Option<String>,
    url_error: Option<String>,
    formats: Vec<FormatOption>,
    selected_format: Option<FormatOption>,
    mode: DownloadMode,
    progress: f32,
    validate_in_flight: bool,
    download_in_flight: bool,
    pending_save: Option<SaveAction>,
    thumbnail: Option<Bytes>,
    /// Bumped per admitted download attempt; progress ticks carrying an
    /// older value belong to a finished attempt and are dropped.
    attempt: u64,
}

impl Orchestrator {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            session: None,
            phase: Phase::Idle,
            status_message: None,
            url_error: None,
            formats: Vec::new(),
            selected_format: None,
            mode: DownloadMode::Video,
            progress: 0.0,
            validate_in_flight: false,
            download_in_flight: false,
            pending_save: None,
            thumbnail: None,
            attempt: 0,
        }
    }

    /// Check the input locally and admit at most one validation request at a
    /// time. Returns the trimmed URL to send to the backend, or `None` when
    /// the input was rejected (the error is set on `url_error`) or a request
    /// is already in flight.
    pub fn begin_validation(&mut self, raw_url: &str) -> Option<String> {
        if self.validate_in_flight {
            return None;
        }

        let url = raw_url.trim();
        if url.is_empty() {
            self.url_error = Some("Please enter a URL".to_string());
            return None;
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            self.url_error = Some("URL must start with http:// or https://".to_string());
            return None;
        }

        self.validate_in_flight = true;
        self.url_error = None;
        // Prior results go away; the download control stays unavailable
        // until this validation succeeds.
        self.session = None;
        self.formats.clear();
        self.selected_format = None;
        self.thumbnail = None;

        Some(url.to_string())
    }

    /// Record the outcome of a validation request. The in-flight flag is
    /// always cleared, whatever the outcome.
    pub fn finish_validation(
        &mut self,
        url: String,
        outcome: Result<ValidationResponse, AppError>,
    ) {
        self.validate_in_flight = false;

        match outcome {
            Ok(response) if response.valid => {
                let info = response.video_info;
                self.formats = build_format_options(
                    info.as_ref().map(|i| i.formats.as_slice()).unwrap_or(&[]),
                );
                self.selected_format = self.formats.first().cloned();
                self.session = Some(Session {
                    url,
                    video_info: info,
                });
                self.url_error = None;
            }
            Ok(response) => {
                self.url_error =
                    Some(response.message.unwrap_or_else(|| "Invalid URL".to_string()));
            }
            Err(e) => {
                self.url_error = Some(format!("Failed to validate URL. {}", e));
            }
        }
    }

    /// Thumbnail URL of the current session, if the backend supplied one.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.video_info().and_then(|info| info.thumbnail.as_deref())
    }

    /// Record a fetched thumbnail. Ignored when it no longer belongs to the
    /// current session (a new validation started meanwhile) or the fetch
    /// failed; the thumbnail is cosmetic.
    pub fn finish_thumbnail(&mut self, url: String, outcome: Result<Bytes, AppError>) {
        if self.thumbnail_url() != Some(url.as_str()) {
            return;
        }
        if let Ok(bytes) = outcome {
            self.thumbnail = Some(bytes);
        }
    }

    pub fn set_mode(&mut self, mode: DownloadMode) {
        self.mode = mode;
    }

    pub fn select_format(&mut self, format: FormatOption) {
        self.selected_format = Some(format);
    }

    /// The format dropdown only applies to video downloads.
    pub fn format_selector_visible(&self) -> bool {
        self.mode == DownloadMode::Video
    }

    /// Admit a download attempt and build its request. Fails locally when no
    /// validated URL is on record.
    pub fn begin_download(&mut self) -> Result<DownloadRequest, AppError> {
        if self.download_in_flight {
            return Err(AppError::InvalidInput(
                "A download is already in progress".to_string(),
            ));
        }

        let session = match &self.session {
            Some(session) => session,
            None => {
                let err = AppError::InvalidInput("Please validate a URL first".to_string());
                self.phase = Phase::Error;
                self.status_message = Some(err.to_string());
                return Err(err);
            }
        };

        self.download_in_flight = true;
        self.attempt += 1;
        self.phase = Phase::Waiting;
        self.status_message = Some("Preparing download...".to_string());
        self.progress = 0.0;
        self.pending_save = None;

        let audio_only = self.mode == DownloadMode::AudioOnly;
        let format_id = if audio_only {
            None
        } else {
            Some(
                self.selected_format
                    .as_ref()
                    .map(|f| f.id.clone())
                    .unwrap_or_else(|| FALLBACK_FORMAT_ID.to_string()),
            )
        };

        Ok(DownloadRequest {
            url: session.url.clone(),
            format_id,
            audio_only,
        })
    }

    /// Record the backend's answer to a download request. Returns `true`
    /// when the success timers (progress simulation and completion delay)
    /// should start.
    pub fn finish_download(&mut self, outcome: Result<DownloadResponse, AppError>) -> bool {
        match outcome {
            Ok(response) if response.is_success() => {
                let filename = response
                    .filename
                    .clone()
                    .unwrap_or_else(|| "download".to_string());
                self.pending_save = response.download_url.as_deref().map(|path| SaveAction {
                    file_url: self.config.file_url(path),
                    filename: filename.clone(),
                });
                self.phase = Phase::Downloading;
                self.status_message = Some(format!("Downloading: {}...", filename));
                true
            }
            Ok(response) => {
                self.fail_download(
                    response
                        .message
                        .unwrap_or_else(|| "Download failed".to_string()),
                );
                false
            }
            Err(_) => {
                self.fail_download("Download failed. Check your connection.".to_string());
                false
            }
        }
    }

    /// Advance the cosmetic progress bar. Ticks from an earlier attempt or
    /// arriving outside the Downloading phase are dropped, and the value is
    /// clamped to the ceiling; only `complete_download` reaches 100%.
    pub fn apply_progress(&mut self, attempt: u64, percent: f32) {
        if attempt == self.attempt && self.phase == Phase::Downloading {
            self.progress = percent.min(PROGRESS_CEILING);
        }
    }

    /// Called once the fixed success delay elapses. Returns the file-save
    /// action to carry out, when the backend provided a download URL.
    pub fn complete_download(&mut self) -> Option<SaveAction> {
        if self.phase != Phase::Downloading {
            return None;
        }

        self.phase = Phase::Success;
        self.progress = 100.0;
        self.download_in_flight = false;

        let save = self.pending_save.take();
        self.status_message = Some(match &save {
            Some(action) => format!("Download complete! File: {}", action.filename),
            None => "Download complete!".to_string(),
        });
        save
    }

    /// Record the outcome of the file-save side effect. A cancelled save
    /// dialog is not an error.
    pub fn finish_save(&mut self, outcome: Result<Option<PathBuf>, AppError>) {
        match outcome {
            Ok(Some(path)) => {
                self.status_message = Some(format!("Saved: {}", path.display()));
            }
            Ok(None) => {
                self.status_message = Some("Save cancelled".to_string());
            }
            Err(e) => {
                self.phase = Phase::Error;
                self.status_message = Some(format!("Failed to save file: {}", e));
            }
        }
    }

    fn fail_download(&mut self, message: String) {
        self.phase = Phase::Error;
        self.status_message = Some(message);
        self.download_in_flight = false;
    }

    // Accessors for rendering

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn url_error(&self) -> Option<&str> {
        self.url_error.as_deref()
    }

    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.session.as_ref().and_then(|s| s.video_info.as_ref())
    }

    /// Uploader and duration line shown under the title.
    pub fn video_meta(&self) -> Option<String> {
        self.video_info().map(|info| {
            let uploader = info.uploader.as_deref().unwrap_or("Unknown");
            format!("{} • {}", uploader, format_duration(info.duration))
        })
    }

    pub fn formats(&self) -> &[FormatOption] {
        &self.formats
    }

    pub fn selected_format(&self) -> Option<&FormatOption> {
        self.selected_format.as_ref()
    }

    pub fn mode(&self) -> DownloadMode {
        self.mode
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn thumbnail(&self) -> Option<&Bytes> {
        self.thumbnail.as_ref()
    }

    pub fn current_attempt(&self) -> u64 {
        self.attempt
    }

    pub fn validate_in_flight(&self) -> bool {
        self.validate_in_flight
    }

    pub fn download_in_flight(&self) -> bool {
        self.download_in_flight
    }

    pub fn can_download(&self) -> bool {
        self.session.is_some() && !self.download_in_flight
    }
}

fn build_format_options(formats: &[MediaFormat]) -> Vec<FormatOption> {
    if formats.is_empty() {
        return vec![FormatOption {
            id: FALLBACK_FORMAT_ID.to_string(),
            label: "Best Quality".to_string(),
        }];
    }

    formats
        .iter()
        .map(|format| {
            let id = format
                .format_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| FALLBACK_FORMAT_ID.to_string());
            let resolution = format.resolution.as_deref().unwrap_or("Unknown");
            let label = match format.filesize.filter(|&bytes| bytes > 0) {
                Some(bytes) => format!("{} ({})", resolution, format_file_size(bytes)),
                None => resolution.to_string(),
            };
            FormatOption { id, label }
        })
        .collect()
}

/// Cosmetic progress feed: a random 0-15 step per tick, clamped at the
/// ceiling, where the stream ends. The backend reports no real transfer
/// progress.
pub fn simulated_progress(tick: Duration) -> BoxStream<'static, f32> {
    futures::stream::unfold(0.0f32, move |progress| async move {
        if progress >= PROGRESS_CEILING {
            return None;
        }
        tokio::time::sleep(tick).await;
        let step: f32 = rand::rng().random_range(0.0..15.0);
        let next = (progress + step).min(PROGRESS_CEILING);
        Some((next, next))
    })
    .boxed()
}
