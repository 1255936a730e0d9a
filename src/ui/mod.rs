use iced::{
    widget::{button, column, pick_list, progress_bar, radio, row, text, text_input, Space},
    Element, Length,
};

use crate::application::Orchestrator;
use crate::domain::{DownloadMode, FormatOption, Phase};

/// Presentation-only state; everything else is rendered from the
/// orchestrator.
#[derive(Default)]
pub struct DownloadView {
    pub url_input: String,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    ValidatePressed,
    ModeSelected(DownloadMode),
    FormatSelected(FormatOption),
    DownloadPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url_input = url;
            }
            // Everything else is handled by the app
            _ => {}
        }
    }

    pub fn view<'a>(&'a self, orchestrator: &'a Orchestrator) -> Element<'a, DownloadMessage> {
        let validate_label = if orchestrator.validate_in_flight() {
            "Validating..."
        } else {
            "Validate"
        };

        let mut content = column![
            text("Media Fetcher").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("Media URL:").size(16),
            text_input("https://...", &self.url_input)
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::ValidatePressed)
                .padding(10),
            button(validate_label)
                .on_press_maybe(
                    (!orchestrator.validate_in_flight()).then_some(DownloadMessage::ValidatePressed),
                )
                .padding([10, 20]),
        ]
        .padding(20)
        .spacing(10);

        if let Some(error) = orchestrator.url_error() {
            content = content.push(text(error).size(14));
        }

        if let Some(info) = orchestrator.video_info() {
            content = content.push(Space::new().height(Length::Fixed(10.0)));
            content = content.push(text(info.title.as_deref().unwrap_or("Unknown Title")).size(20));
            if let Some(meta) = orchestrator.video_meta() {
                content = content.push(text(meta).size(14));
            }
            if let Some(thumbnail) = orchestrator.thumbnail() {
                content = content.push(
                    iced::widget::image(iced::widget::image::Handle::from_bytes(
                        thumbnail.clone(),
                    ))
                    .width(Length::Fixed(320.0)),
                );
            }
        }

        let mode = orchestrator.mode();
        content = content.push(
            row![
                radio("Video", DownloadMode::Video, Some(mode), DownloadMessage::ModeSelected),
                radio(
                    "Audio only",
                    DownloadMode::AudioOnly,
                    Some(mode),
                    DownloadMessage::ModeSelected
                ),
            ]
            .spacing(20),
        );

        if orchestrator.format_selector_visible() && !orchestrator.formats().is_empty() {
            content = content.push(text("Format:").size(16));
            content = content.push(
                pick_list(
                    orchestrator.formats().to_vec(),
                    orchestrator.selected_format().cloned(),
                    DownloadMessage::FormatSelected,
                )
                .padding(10),
            );
        }

        let download_label = if orchestrator.download_in_flight() {
            "Downloading..."
        } else {
            "Download"
        };
        content = content.push(
            button(download_label)
                .on_press_maybe(
                    orchestrator
                        .can_download()
                        .then_some(DownloadMessage::DownloadPressed),
                )
                .padding([10, 20]),
        );

        if orchestrator.phase() != Phase::Idle {
            if let Some(status) = orchestrator.status_message() {
                content = content.push(text(status).size(14));
            }
            if matches!(orchestrator.phase(), Phase::Downloading | Phase::Success) {
                content = content.push(progress_bar(0.0..=100.0, orchestrator.progress()));
            }
        }

        content.into()
    }
}
