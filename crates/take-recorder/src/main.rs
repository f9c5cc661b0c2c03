//! Take Recorder: record, review, trim and save microphone takes from the
//! terminal.

mod app;
mod app_command;
mod config;
mod error;
mod exporter;
mod logging;
mod media;
mod microphone;
mod presenter;
mod toast;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::{
    config::Config, exporter::TakeExporter, media::WavTrimCodec, microphone::MicrophoneBackend,
};

use std::time::Duration;

use take_recorder_core::RecordingSession;
use tracing::{error, info};

/// Application entry point.
fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let export_dir = match config.export_directory() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve export directory: {:?}", e);
            eprintln!("Failed to resolve export directory: {}", e);
            std::process::exit(1);
        }
    };

    // The cpal stream is !Send, so the session and everything driving it
    // stay on this thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let backend = MicrophoneBackend::new(
        config.recording.selected_device.clone(),
        config.recording.max_duration_secs,
    );
    let session =
        RecordingSession::new(backend, config.session_config()).with_trim_codec(WavTrimCodec);

    let app = App::new(session, TakeExporter::new(export_dir), &config);

    if let Err(e) = runtime.block_on(app.run()) {
        error!(error = ?e, "App error");
        eprintln!("{}", e);
    }

    // The stdin forwarder may still be blocked on a read.
    runtime.shutdown_timeout(Duration::from_millis(100));
    info!("Take Recorder exited");
}
