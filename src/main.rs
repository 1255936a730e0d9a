mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    iced::application(app::boot, app::update, app::view)
        .title("Media Fetcher")
        .run()
}
