use std::path::PathBuf;

use futures::StreamExt;
use iced::Task;
use tracing::{debug, info, warn};

use crate::api::models::{ApiConfig, DownloadResponse, HealthResponse, ValidationResponse};
use crate::api::ApiClient;
use crate::application::{orchestrator, Orchestrator};
use crate::domain::{AppError, SaveAction};
use crate::ui::{DownloadMessage, DownloadView};
use crate::utils::sanitize_filename;

pub struct DownloadApp {
    view: DownloadView,
    orchestrator: Orchestrator,
    api_client: ApiClient,
}

/// Build the app and fire the startup health probe. Its outcome is only
/// logged, never shown to the user.
pub fn boot() -> (DownloadApp, Task<Message>) {
    // The origin the backend is deployed under, when not running locally.
    let origin = std::env::var("MEDIA_FETCHER_ORIGIN").unwrap_or_default();
    let api_client = ApiClient::new(ApiConfig::for_origin(&origin));
    let orchestrator = Orchestrator::new(api_client.config().clone());
    let probe_client = api_client.clone();

    let app = DownloadApp {
        view: DownloadView::default(),
        orchestrator,
        api_client,
    };

    let health_check = Task::perform(
        async move {
            probe_client
                .check_health()
                .await
                .map_err(|e| e.to_string())
        },
        Message::HealthChecked,
    );

    (app, health_check)
}

#[derive(Debug, Clone)]
pub enum Message {
    Ui(DownloadMessage),
    HealthChecked(Result<HealthResponse, String>),
    /// (Validated URL, outcome)
    ValidationFinished(String, Result<ValidationResponse, AppError>),
    /// (Thumbnail URL, fetched bytes)
    ThumbnailLoaded(String, Result<bytes::Bytes, AppError>),
    DownloadAccepted(Result<DownloadResponse, AppError>),
    /// (Download attempt, simulated progress percentage 0 to 95)
    ProgressTicked(u64, f32),
    SuccessDelayElapsed,
    FileSaved(Result<Option<PathBuf>, AppError>),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::Ui(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::ValidatePressed => {
                    if let Some(url) = app.orchestrator.begin_validation(&app.view.url_input) {
                        let api_client = app.api_client.clone();
                        return Task::perform(
                            async move {
                                let outcome = api_client
                                    .validate_url(&url)
                                    .await
                                    .map_err(AppError::from);
                                (url, outcome)
                            },
                            |(url, outcome)| Message::ValidationFinished(url, outcome),
                        );
                    }
                }
                DownloadMessage::ModeSelected(mode) => {
                    app.orchestrator.set_mode(mode);
                }
                DownloadMessage::FormatSelected(format) => {
                    app.orchestrator.select_format(format);
                }
                DownloadMessage::DownloadPressed => match app.orchestrator.begin_download() {
                    Ok(request) => {
                        let api_client = app.api_client.clone();
                        return Task::perform(
                            async move {
                                api_client
                                    .request_download(&request)
                                    .await
                                    .map_err(AppError::from)
                            },
                            Message::DownloadAccepted,
                        );
                    }
                    Err(e) => {
                        debug!("download not started: {}", e);
                    }
                },
                DownloadMessage::UrlChanged(_) => {}
            }
        }
        Message::HealthChecked(result) => match result {
            Ok(health) if health.status == "healthy" => {
                info!("server is online");
            }
            Ok(health) => {
                warn!(status = %health.status, "unexpected server health status");
            }
            Err(e) => {
                warn!("server health check failed: {}", e);
            }
        },
        Message::ValidationFinished(url, outcome) => {
            app.orchestrator.finish_validation(url, outcome);

            if let Some(thumbnail_url) = app.orchestrator.thumbnail_url() {
                let thumbnail_url = thumbnail_url.to_string();
                let api_client = app.api_client.clone();
                return Task::perform(
                    async move {
                        let outcome = api_client
                            .fetch_file(&thumbnail_url)
                            .await
                            .map_err(AppError::from);
                        (thumbnail_url, outcome)
                    },
                    |(url, outcome)| Message::ThumbnailLoaded(url, outcome),
                );
            }
        }
        Message::ThumbnailLoaded(url, outcome) => {
            if let Err(e) = &outcome {
                debug!("thumbnail fetch failed: {}", e);
            }
            app.orchestrator.finish_thumbnail(url, outcome);
        }
        Message::DownloadAccepted(outcome) => {
            if app.orchestrator.finish_download(outcome) {
                // The cosmetic progress feed and the fixed completion delay
                // run side by side; the delay decides actual completion.
                let attempt = app.orchestrator.current_attempt();
                return Task::batch([
                    Task::stream(
                        orchestrator::simulated_progress(orchestrator::PROGRESS_TICK)
                            .map(move |percent| Message::ProgressTicked(attempt, percent)),
                    ),
                    Task::perform(tokio::time::sleep(orchestrator::SUCCESS_DELAY), |_| {
                        Message::SuccessDelayElapsed
                    }),
                ]);
            }
        }
        Message::ProgressTicked(attempt, percent) => {
            app.orchestrator.apply_progress(attempt, percent);
        }
        Message::SuccessDelayElapsed => {
            if let Some(action) = app.orchestrator.complete_download() {
                let api_client = app.api_client.clone();
                return Task::perform(save_file(api_client, action), Message::FileSaved);
            }
        }
        Message::FileSaved(outcome) => {
            app.orchestrator.finish_save(outcome);
        }
    }
    Task::none()
}

/// Fetch the finished file and write it to a user-chosen location. A
/// dismissed dialog yields `Ok(None)`.
async fn save_file(client: ApiClient, action: SaveAction) -> Result<Option<PathBuf>, AppError> {
    let suggested = sanitize_filename(&action.filename);

    let handle = rfd::AsyncFileDialog::new()
        .set_file_name(&suggested)
        .save_file()
        .await;
    let path = match handle {
        Some(handle) => handle.path().to_path_buf(),
        None => return Ok(None),
    };

    let body = client
        .fetch_file(&action.file_url)
        .await
        .map_err(AppError::from)?;
    tokio::fs::write(&path, &body)
        .await
        .map_err(|e| AppError::Io(e.to_string()))?;

    Ok(Some(path))
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view(&app.orchestrator).map(Message::Ui)
}
