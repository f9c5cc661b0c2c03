use serde::{Deserialize, Serialize};

/// Where the recording session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No takes, no device.
    Idle,
    /// Device held, counting down to capture.
    Countdown,
    /// Capturing.
    Recording,
    /// Capture suspended, device still held.
    Paused,
    /// At least one take exists, nothing is playing.
    Recorded,
    /// The selected take is being played back.
    Playing,
    /// The selected take is open in the trim editor.
    Trimming,
}

/// Inputs to [`RecordingState::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Device acquired, start the lead-in.
    BeginCountdown,
    /// Lead-in finished, capture started.
    CountdownElapsed,
    /// Suspend capture.
    Pause,
    /// Continue capture.
    Resume,
    /// Finish capture and commit the take.
    Stop,
    /// Capture ended without a take.
    CaptureAborted {
        /// Whether earlier takes still exist.
        has_takes: bool,
    },
    /// Start playback of the selected take.
    Play,
    /// Playback reached its end or was stopped.
    PlaybackEnded,
    /// Open the trim editor.
    StartTrim,
    /// Move a trim handle or reset the range.
    EditTrim,
    /// Close the trim editor, applied or cancelled.
    EndTrim,
    /// Select another take.
    Select,
    /// Delete the selected take while others remain.
    DeleteSelected,
    /// Delete the only remaining take.
    DeleteLast,
    /// Delete every take.
    Reset,
}

impl RecordingState {
    /// Applies `transition`, returning `None` if it is illegal here.
    pub fn next(self, transition: Transition) -> Option<RecordingState> {
        use RecordingState::*;
        use Transition as T;

        match (self, transition) {
            (Idle | Recorded, T::BeginCountdown) => Some(Countdown),
            (Countdown, T::CountdownElapsed) => Some(Recording),
            (Recording, T::Pause) => Some(Paused),
            (Paused, T::Resume) => Some(Recording),
            (Recording | Paused, T::Stop) => Some(Recorded),
            (Countdown | Recording | Paused, T::CaptureAborted { has_takes }) => {
                Some(if has_takes { Recorded } else { Idle })
            }
            (Recorded, T::Play) => Some(Playing),
            (Playing, T::PlaybackEnded) => Some(Recorded),
            (Recorded, T::StartTrim) => Some(Trimming),
            (Trimming, T::EditTrim) => Some(Trimming),
            (Trimming, T::EndTrim) => Some(Recorded),
            (Recorded | Playing | Trimming, T::Select | T::DeleteSelected) => Some(Recorded),
            (Recorded | Playing | Trimming, T::DeleteLast) => Some(Idle),
            (Idle | Recorded | Playing | Trimming, T::Reset) => Some(Idle),
            _ => None,
        }
    }

    /// Whether the device session holds a stream in this state.
    pub fn holds_device(self) -> bool {
        matches!(self, Self::Countdown | Self::Recording | Self::Paused)
    }

    /// Whether a recorder is running or paused.
    pub fn is_capturing(self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }

    /// Whether the audio meter should run.
    pub fn meters_audio(self) -> bool {
        self.holds_device()
    }
}
