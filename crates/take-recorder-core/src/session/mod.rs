mod config;
mod event;
mod machine;
mod snapshot;
mod state;

pub use {
    config::{DEFAULT_FILENAME_STEM, SessionConfig},
    event::{Advisory, SessionEvent, Severity},
    machine::RecordingSession,
    snapshot::{SaveRequest, SessionSnapshot},
    state::{RecordingState, Transition},
};
