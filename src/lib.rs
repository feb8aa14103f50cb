pub mod app;
pub mod browser;
mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod library;
pub mod logging;
pub mod notice;
pub mod notification;
pub mod permission;
pub mod settings;
pub mod state;
pub mod storage;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary and by integrations embedding the browser.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting Swiper");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!(photo_count = app.photo_count(), "shut down");
    Ok(())
}
