use crate::{
    config::default_max_duration_secs,
    media::WAV_MIME,
    microphone::{CaptureBuffer, MicrophoneStream, WavRecorder, recording_capacity},
};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use cpal::{
    Device, Host,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use take_recorder_core::{
    AcquireFailure, AcquireFuture, Capabilities, CaptureBackend, MediaConstraints,
    RecorderFailure,
};
use tracing::{error, info, instrument, warn};

/// Capture backend over the host's audio input devices.
#[derive(Debug, Clone)]
pub(crate) struct MicrophoneBackend {
    selected_device: Option<String>,
    /// Recording time limit; sizes each recorder's sample buffer.
    max_duration_secs: u32,
}

impl MicrophoneBackend {
    /// Backend for a named input device (None = system default).
    pub(crate) fn new(selected_device: Option<String>, max_duration_secs: u32) -> Self {
        Self {
            selected_device,
            max_duration_secs,
        }
    }
}

impl Default for MicrophoneBackend {
    fn default() -> Self {
        Self::new(None, default_max_duration_secs())
    }
}

impl CaptureBackend for MicrophoneBackend {
    type Stream = MicrophoneStream;
    type Recorder = WavRecorder;

    fn capabilities(&self) -> Capabilities {
        let host = cpal::default_host();

        Capabilities {
            media_devices: host.default_input_device().is_some()
                || host.input_devices().is_ok_and(|mut devices| devices.next().is_some()),
            recorder: true,
            // A local process is never an insecure origin.
            secure_context: true,
        }
    }

    fn acquire(&self, constraints: MediaConstraints) -> AcquireFuture<Self::Stream> {
        let selected = self.selected_device.clone();

        Box::pin(async move {
            if !constraints.audio {
                return Err(AcquireFailure::Other(
                    "microphone capture requires an audio track".to_string(),
                ));
            }
            if constraints.video.is_some() {
                warn!("Video track requested but only audio is available; ignoring");
            }
            open_stream(selected.as_deref())
        })
    }

    fn is_type_supported(&self, mime: &str) -> bool {
        mime.split(';').next().map(str::trim) == Some(WAV_MIME)
    }

    fn create_recorder(
        &self,
        stream: &mut Self::Stream,
        mime: &str,
    ) -> Result<Self::Recorder, RecorderFailure> {
        if !self.is_type_supported(mime) {
            return Err(RecorderFailure::Failed(format!(
                "unsupported recording format: {}",
                mime
            )));
        }

        let sample_rate = stream.sample_rate();
        let capacity = recording_capacity(sample_rate, self.max_duration_secs);

        Ok(WavRecorder::new(stream.buffer(), sample_rate, capacity))
    }
}

#[instrument]
fn open_stream(selected: Option<&str>) -> Result<MicrophoneStream, AcquireFailure> {
    let host = cpal::default_host();
    let device = find_device(&host, selected)?;

    let config = device
        .default_input_config()
        .map_err(|e| match e {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => AcquireFailure::NotReadable,
            other => AcquireFailure::Other(format!("Failed to get config: {}", other)),
        })?;

    let stream_config: cpal::StreamConfig = config.into();
    let channels = usize::from(stream_config.channels);
    let sample_rate = stream_config.sample_rate;

    let buffer = CaptureBuffer::shared();
    let shutdown = Arc::new(AtomicBool::new(false));

    let data_buffer = Arc::clone(&buffer);
    let data_shutdown = Arc::clone(&shutdown);
    let error_buffer = Arc::clone(&buffer);

    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Once stop_tracks() sets this flag no new samples are
                // written, even if cpal fires one more callback.
                if data_shutdown.load(Ordering::Acquire) {
                    return;
                }
                CaptureBuffer::lock(&data_buffer).push_interleaved(data, channels);
            },
            move |err| {
                error!("Audio stream error: {}", err);
                CaptureBuffer::lock(&error_buffer).record_error(err.to_string());
            },
            None,
        )
        .map_err(|e| match e {
            cpal::BuildStreamError::DeviceNotAvailable => AcquireFailure::NotReadable,
            other => AcquireFailure::Other(format!("Failed to build stream: {}", other)),
        })?;

    stream
        .play()
        .map_err(|e| AcquireFailure::Other(format!("Failed to start stream: {}", e)))?;

    info!(sample_rate, channels, "Microphone stream opened");

    Ok(MicrophoneStream::new(
        Some(stream),
        buffer,
        shutdown,
        sample_rate,
    ))
}

fn find_device(host: &Host, selected: Option<&str>) -> Result<Device, AcquireFailure> {
    let Some(name) = selected else {
        return host.default_input_device().ok_or(AcquireFailure::NotFound);
    };

    let mut devices = host
        .input_devices()
        .map_err(|e| AcquireFailure::Other(format!("Failed to list input devices: {}", e)))?;

    #[allow(deprecated)]
    let found = devices.find(|device| device.name().is_ok_and(|device_name| device_name == name));

    found.ok_or(AcquireFailure::NotFound)
}
