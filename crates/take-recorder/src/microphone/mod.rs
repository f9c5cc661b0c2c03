//! cpal-backed capture: the default (or configured) microphone as the
//! session's stream, WAV as its recording format.

mod backend;
mod buffer;
mod recorder;
mod stream;

pub(crate) use {
    backend::MicrophoneBackend,
    buffer::{CaptureBuffer, recording_capacity},
    recorder::WavRecorder,
    stream::MicrophoneStream,
};
