use crate::{
    CoreResult, SessionError, TakeId,
    device::{
        AcquireFailure, AcquireFuture, CaptureBackend, DeviceSession, MediaStream, acquire_error,
        extension_for,
    },
    error::ErrorClass,
    session::{
        Advisory, RecordingState, SaveRequest, SessionConfig, SessionEvent, SessionSnapshot,
        Severity, Transition,
    },
    takes::{Take, TakeStore, Thumbnail, ThumbnailJob},
    telemetry::{
        AudioMeter, Countdown, FFT_SIZE, FrequencyAnalyser, MeterReading, RecordingTimer,
        TimerSignal,
    },
    trim::{MetadataOnlyTrim, TrimCodec, TrimEditor, TrimRange},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// The recording widget's state machine.
///
/// Owns the device session, the take store, the trim editor and every piece
/// of live telemetry. Telemetry lives exactly as long as the state that
/// authorises it: entering a state creates what it needs and leaving it
/// drops the rest.
///
/// All intents are synchronous except acquisition, which is split into
/// [`request_acquisition`](Self::request_acquisition) and
/// [`complete_acquisition`](Self::complete_acquisition) so the host can keep
/// handling other intents while a permission prompt is open.
pub struct RecordingSession<B: CaptureBackend> {
    backend: B,
    config: SessionConfig,
    state: RecordingState,
    unsupported: Option<String>,
    acquisition_pending: bool,
    error: Option<String>,
    device: DeviceSession<B>,
    takes: TakeStore,
    trim: Option<TrimEditor>,
    trim_codec: Box<dyn TrimCodec>,
    countdown: Option<Countdown>,
    timer: Option<RecordingTimer>,
    meter: Option<AudioMeter>,
    analyser: FrequencyAnalyser,
    samples: Vec<f32>,
    reading: MeterReading,
    events: Vec<SessionEvent>,
    thumbnail_jobs: Vec<ThumbnailJob>,
}

impl<B: CaptureBackend> RecordingSession<B> {
    /// Builds a session and checks the environment once.
    ///
    /// A missing capture or recorder capability makes the session
    /// permanently unsupported. A missing secure context only fills the
    /// error slot.
    #[instrument(skip(backend, config))]
    pub fn new(backend: B, config: SessionConfig) -> Self {
        let capabilities = backend.capabilities();

        let mut session = Self {
            backend,
            config,
            state: RecordingState::Idle,
            unsupported: None,
            acquisition_pending: false,
            error: None,
            device: DeviceSession::new(),
            takes: TakeStore::new(),
            trim: None,
            trim_codec: Box::new(MetadataOnlyTrim),
            countdown: None,
            timer: None,
            meter: None,
            analyser: FrequencyAnalyser::new(),
            samples: vec![0.0; FFT_SIZE],
            reading: MeterReading::default(),
            events: Vec::new(),
            thumbnail_jobs: Vec::new(),
        };

        let missing = if !capabilities.media_devices {
            Some("This environment doesn't support camera access.")
        } else if !capabilities.recorder {
            Some("This environment doesn't support video recording.")
        } else {
            None
        };

        if let Some(reason) = missing {
            let err = SessionError::UnsupportedEnvironment {
                reason: reason.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
            session.unsupported = Some(reason.to_string());
            session.surface(&err);
        } else if !capabilities.secure_context {
            let err = SessionError::InsecureContext {
                location: ErrorLocation::from(Location::caller()),
            };
            session.surface(&err);
        }

        info!(
            supported = session.is_supported(),
            secure_context = capabilities.secure_context,
            "Recording session created"
        );

        session
    }

    /// Replaces the codec used by [`apply_trim`](Self::apply_trim).
    pub fn with_trim_codec(mut self, codec: impl TrimCodec + 'static) -> Self {
        self.trim_codec = Box::new(codec);
        self
    }

    // ----- acquisition and capture -----

    /// Starts acquiring the device for a new take.
    ///
    /// The returned future owns everything it needs; await it and hand the
    /// result to [`complete_acquisition`](Self::complete_acquisition).
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionPending` if a request is already outstanding and
    /// `InvalidTransition` outside Idle/Recorded.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn request_acquisition(&mut self) -> CoreResult<AcquireFuture<B::Stream>> {
        self.ensure_supported()?;

        if self.acquisition_pending {
            return Err(SessionError::AcquisitionPending {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.guard(Transition::BeginCountdown)?;

        if self.device.has_stream() {
            return Err(SessionError::StreamAlreadyActive {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.error = None;
        self.acquisition_pending = true;

        info!("Requesting camera and microphone access");

        Ok(self.backend.acquire(self.config.constraints.clone()))
    }

    /// Installs the outcome of an acquisition.
    ///
    /// On success the countdown starts (or capture, with a zero countdown).
    /// On failure the error slot is filled and the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the state moved on while the request
    /// was pending; the stream is stopped.
    #[track_caller]
    #[instrument(skip(self, result))]
    pub fn complete_acquisition(
        &mut self,
        result: Result<B::Stream, AcquireFailure>,
    ) -> CoreResult<RecordingState> {
        self.acquisition_pending = false;

        let mut stream = match result {
            Ok(stream) => stream,
            Err(failure) => {
                let err = acquire_error(failure);
                self.surface(&err);
                return Ok(self.state);
            }
        };

        let to = match self.guard(Transition::BeginCountdown) {
            Ok(to) => to,
            Err(e) => {
                stream.stop_tracks();
                return Err(e);
            }
        };

        self.device.install(stream)?;
        self.enter(to);

        if self.config.countdown_secs == 0 {
            return self.countdown_elapsed();
        }

        Ok(self.state)
    }

    /// Requests acquisition and waits for it in one step.
    ///
    /// # Errors
    ///
    /// See [`request_acquisition`](Self::request_acquisition) and
    /// [`complete_acquisition`](Self::complete_acquisition).
    pub async fn begin_countdown(&mut self) -> CoreResult<RecordingState> {
        let acquisition = self.request_acquisition()?;
        let result = acquisition.await;
        self.complete_acquisition(result)
    }

    /// Counts one second of lead-in; starts capture when it runs out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Countdown.
    #[track_caller]
    pub fn tick_countdown(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;

        if self.state != RecordingState::Countdown {
            return Err(self.rejected(Transition::CountdownElapsed));
        }

        let elapsed = self.countdown.as_mut().is_none_or(Countdown::tick);

        if elapsed {
            return self.countdown_elapsed();
        }

        debug!(
            remaining = self.countdown_remaining().unwrap_or_default(),
            "Countdown tick"
        );

        Ok(self.state)
    }

    /// Suspends capture.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::Pause)?;

        match self.device.pause() {
            Ok(_) => self.enter(to),
            Err(e) => self.absorb(e)?,
        }

        Ok(self.state)
    }

    /// Continues a paused capture.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::Resume)?;

        match self.device.resume() {
            Ok(()) => self.enter(to),
            Err(e) => self.absorb(e)?,
        }

        Ok(self.state)
    }

    /// Finishes capture and commits the take.
    ///
    /// The device is released whatever happens. A recorder failure on stop
    /// fills the error slot and leaves no take.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Recording/Paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::Stop)?;

        match self.device.finish() {
            Ok(output) => {
                let take_id = self.takes.commit(output.artifact.clone(), output.duration).id();

                self.thumbnail_jobs.push(ThumbnailJob {
                    take_id,
                    artifact: output.artifact,
                    duration: output.duration,
                });
                self.events.push(SessionEvent::TakeCommitted { take_id });
                self.enter(to);
            }
            Err(e) => {
                self.abort_capture();
                self.absorb(e)?;
            }
        }

        Ok(self.state)
    }

    /// Stops capture because the recording limit was hit.
    ///
    /// Ignored outside Recording/Paused, since the limit may race a manual
    /// stop.
    ///
    /// # Errors
    ///
    /// See [`stop`](Self::stop).
    #[track_caller]
    pub fn handle_time_limit(&mut self) -> CoreResult<RecordingState> {
        if !self.state.is_capturing() {
            debug!(state = ?self.state, "Time limit ignored outside capture");
            return Ok(self.state);
        }

        info!("Maximum recording time reached");
        self.events.push(SessionEvent::Advisory(Advisory::new(
            "Maximum recording time reached",
            Severity::Warning,
        )));

        self.stop()
    }

    /// Pulls recorder output and reacts to background recorder errors.
    ///
    /// A recorder error during capture aborts it and releases the device.
    pub fn poll_recorder(&mut self) -> RecordingState {
        if let Some(err) = self.device.collect() {
            self.surface(&err);
            if self.state.holds_device() {
                self.abort_capture();
            }
        }

        self.state
    }

    // ----- telemetry -----

    /// Advances the recording clock by one second.
    ///
    /// Only counts while Recording. Warnings become advisories; on
    /// [`TimerSignal::LimitReached`] the host should call
    /// [`handle_time_limit`](Self::handle_time_limit).
    pub fn tick_timer(&mut self) -> Vec<TimerSignal> {
        if self.state != RecordingState::Recording {
            return Vec::new();
        }

        let Some(timer) = self.timer.as_mut() else {
            return Vec::new();
        };

        let signals = timer.tick();
        for signal in &signals {
            match signal {
                TimerSignal::Warning { remaining_secs } => {
                    info!(remaining_secs, "Recording time warning");
                    self.events.push(SessionEvent::Advisory(Advisory::time_remaining(
                        *remaining_secs,
                    )));
                }
                TimerSignal::LimitReached => self.events.push(SessionEvent::TimeLimitReached),
            }
        }

        signals
    }

    /// Computes one meter frame from the live stream.
    ///
    /// Returns `None` when the current state does not meter audio.
    pub fn meter_frame(&mut self) -> Option<MeterReading> {
        let meter = self.meter.as_mut()?;
        let stream = self.device.stream()?;

        let written = stream
            .audio_samples(&mut self.samples)
            .min(self.samples.len());
        let bins = self.analyser.analyse(&self.samples[..written]);
        self.reading = meter.update(bins, Instant::now());

        Some(self.reading)
    }

    // ----- playback and selection -----

    /// Plays `id`, or the selected take when `None`.
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionPending` while acquiring, `UnknownTake` or
    /// `NoTakeSelected` without a take to play and `InvalidTransition`
    /// outside Recorded/Playing/Trimming.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn play(&mut self, id: Option<TakeId>) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        self.ensure_not_acquiring()?;

        if let Some(id) = id {
            self.select(id)?;
        }

        let to = self.guard(Transition::Play)?;
        let take = self.takes.selected_take().ok_or(SessionError::NoTakeSelected {
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(take_id = %take.id(), uri = take.handle().uri(), "Playback started");
        self.enter(to);

        Ok(self.state)
    }

    /// Returns to Recorded after playback ends.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Playing.
    #[track_caller]
    pub fn playback_ended(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::PlaybackEnded)?;
        self.enter(to);
        Ok(self.state)
    }

    /// Selects a take, stopping playback or trimming.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTake` for an unknown id and `InvalidTransition`
    /// outside Recorded/Playing/Trimming.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn select(&mut self, id: TakeId) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::Select)?;
        self.takes.select(id)?;
        self.enter(to);
        Ok(self.state)
    }

    /// Deletes a take.
    ///
    /// Deleting a non-selected take changes neither state nor selection.
    /// Deleting the selected take selects the most recent remaining one, or
    /// returns to Idle if none remain. While Paused the capture is left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTake` for an unknown id and `InvalidTransition` during
    /// Countdown/Recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: TakeId) -> CoreResult<RecordingState> {
        self.ensure_supported()?;

        if matches!(
            self.state,
            RecordingState::Countdown | RecordingState::Recording
        ) {
            return Err(self.rejected(Transition::DeleteSelected));
        }

        self.takes.get(id)?;

        let was_selected = self.takes.selected() == Some(id);
        let transition = if self.takes.len() == 1 {
            Transition::DeleteLast
        } else {
            Transition::DeleteSelected
        };

        let target = if was_selected && self.state != RecordingState::Paused {
            Some(self.guard(transition)?)
        } else {
            None
        };

        self.takes.delete(id)?;
        self.thumbnail_jobs.retain(|job| job.take_id != id);
        self.events.push(SessionEvent::TakeDeleted { take_id: id });

        if let Some(to) = target {
            self.enter(to);
        }

        Ok(self.state)
    }

    /// Deletes every take and returns to Idle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while the device is held.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete_all(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::Reset)?;

        self.takes.delete_all();
        self.thumbnail_jobs.clear();
        self.enter(to);

        Ok(self.state)
    }

    // ----- trimming -----

    /// Opens the trim editor on the selected take.
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionPending` while acquiring, `NoTakeSelected` without
    /// a selection and `InvalidTransition` outside Recorded.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start_trim(&mut self) -> CoreResult<TrimRange> {
        self.ensure_supported()?;
        self.ensure_not_acquiring()?;
        let to = self.guard(Transition::StartTrim)?;

        let take = self.takes.selected_take().ok_or(SessionError::NoTakeSelected {
            location: ErrorLocation::from(Location::caller()),
        })?;
        let editor = TrimEditor::start(
            take.id(),
            take.duration_secs(),
            self.config.min_trim_separation_secs,
        );
        let range = editor.range();

        self.enter(to);
        self.trim = Some(editor);

        Ok(range)
    }

    /// Moves the trim start handle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Trimming.
    #[track_caller]
    pub fn set_trim_start(&mut self, seconds: f64) -> CoreResult<TrimRange> {
        Ok(self.editor_mut()?.set_start(seconds))
    }

    /// Moves the trim end handle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Trimming.
    #[track_caller]
    pub fn set_trim_end(&mut self, seconds: f64) -> CoreResult<TrimRange> {
        Ok(self.editor_mut()?.set_end(seconds))
    }

    /// Resets the trim range to the whole take.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Trimming.
    #[track_caller]
    pub fn reset_trim(&mut self) -> CoreResult<TrimRange> {
        Ok(self.editor_mut()?.reset())
    }

    /// Closes the trim editor without changing any take.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Trimming.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn cancel_trim(&mut self) -> CoreResult<RecordingState> {
        self.ensure_supported()?;
        let to = self.guard(Transition::EndTrim)?;
        self.enter(to);
        Ok(self.state)
    }

    /// Applies the trim range, adding a new selected take.
    ///
    /// The source take stays in the store.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTrimRange` for a zero-length range (the editor stays
    /// open), `TrimFailed` if the codec fails and `InvalidTransition`
    /// outside Trimming.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn apply_trim(&mut self) -> CoreResult<TakeId> {
        self.ensure_supported()?;
        let to = self.guard(Transition::EndTrim)?;

        let editor = self.trim.as_ref().ok_or(SessionError::NoTakeSelected {
            location: ErrorLocation::from(Location::caller()),
        })?;
        let range = editor.apply()?;
        let source_id = editor.take_id();

        let source = self.takes.get(source_id)?;
        let trimmed = match self.trim_codec.trim(source, range) {
            Ok(trimmed) => trimmed,
            Err(reason) => {
                let err = SessionError::TrimFailed {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                };
                self.surface(&err);
                return Err(err);
            }
        };

        let take = self.takes.replace(source_id, trimmed, range.length())?;
        let take_id = take.id();
        if take.thumbnail().is_none() {
            self.thumbnail_jobs.push(ThumbnailJob {
                take_id,
                artifact: take.artifact().clone(),
                duration: Duration::from_secs_f64(take.duration_secs()),
            });
        }

        self.events.push(SessionEvent::TrimApplied {
            source: source_id,
            take_id,
        });
        self.events.push(SessionEvent::Advisory(Advisory::new(
            "Video trimmed successfully!",
            Severity::Success,
        )));
        self.enter(to);

        Ok(take_id)
    }

    // ----- export -----

    /// Produces a download request for the selected take.
    ///
    /// # Errors
    ///
    /// Returns `NoTakeSelected` without a selection.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> CoreResult<SaveRequest> {
        self.ensure_supported()?;

        let take = self.takes.selected_take().ok_or(SessionError::NoTakeSelected {
            location: ErrorLocation::from(Location::caller()),
        })?;
        let artifact = take.artifact();
        let filename = format!(
            "{}.{}",
            self.config.filename_stem,
            extension_for(artifact.mime())
        );

        info!(take_id = %take.id(), filename = %filename, bytes = artifact.len(), "Save requested");

        Ok(SaveRequest {
            take_id: take.id(),
            payload: artifact.shared_payload(),
            filename,
            mime: artifact.mime().to_string(),
        })
    }

    // ----- thumbnails -----

    /// Hands out thumbnail work queued since the last call.
    pub fn take_thumbnail_jobs(&mut self) -> Vec<ThumbnailJob> {
        std::mem::take(&mut self.thumbnail_jobs)
    }

    /// Stores the outcome of a thumbnail job.
    ///
    /// Failures and results for deleted takes are logged and dropped.
    pub fn attach_thumbnail(&mut self, take_id: TakeId, result: CoreResult<Thumbnail>) {
        match result {
            Ok(thumbnail) => {
                if self.takes.attach_thumbnail(take_id, thumbnail) {
                    self.events.push(SessionEvent::ThumbnailAttached { take_id });
                } else {
                    debug!(take_id = %take_id, "Thumbnail dropped for deleted take");
                }
            }
            Err(e) => warn!(take_id = %take_id, error = %e, "Thumbnail generation failed"),
        }
    }

    // ----- observation -----

    /// Drains queued events in the order they happened.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current state.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Whether the environment supports recording.
    pub fn is_supported(&self) -> bool {
        self.unsupported.is_none()
    }

    /// Whether an acquisition is outstanding.
    pub fn acquisition_pending(&self) -> bool {
        self.acquisition_pending
    }

    /// Contents of the error slot.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Empties the error slot. An unsupported environment cannot be cleared.
    pub fn clear_error(&mut self) {
        if self.is_supported() {
            self.error = None;
        }
    }

    /// The take store.
    pub fn takes(&self) -> &TakeStore {
        &self.takes
    }

    /// The selected take.
    pub fn selected_take(&self) -> Option<&Take> {
        self.takes.selected_take()
    }

    /// Resolves "Take N" (oldest is 1).
    pub fn take_by_number(&self, number: usize) -> Option<TakeId> {
        self.takes.take_by_number(number)
    }

    /// The device session.
    pub fn device(&self) -> &DeviceSession<B> {
        &self.device
    }

    /// The capture backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Seconds left in the countdown.
    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    /// Trim range while trimming.
    pub fn trim_range(&self) -> Option<TrimRange> {
        self.trim.as_ref().map(TrimEditor::range)
    }

    /// Recorded time of the capture in progress, pauses excluded.
    pub fn recorded_duration(&self) -> Duration {
        self.device.elapsed()
    }

    /// Presentation snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            supported: self.is_supported(),
            acquisition_pending: self.acquisition_pending,
            takes: self.takes.summaries(),
            selected: self.takes.selected(),
            error: self.error.clone(),
            meter: self.reading,
            countdown_remaining: self.countdown_remaining(),
            elapsed_secs: self.timer.as_ref().map(RecordingTimer::elapsed_secs),
            remaining_secs: self.timer.as_ref().map(RecordingTimer::remaining_secs),
            max_duration_secs: self.config.max_duration_secs,
            trim: self.trim_range(),
        }
    }

    // ----- internals -----

    fn countdown_elapsed(&mut self) -> CoreResult<RecordingState> {
        let to = self.guard(Transition::CountdownElapsed)?;

        match self.device.begin_capture(&self.backend, &self.config.formats) {
            Ok(_) => self.enter(to),
            Err(e) => {
                self.surface(&e);
                self.abort_capture();
            }
        }

        Ok(self.state)
    }

    fn abort_capture(&mut self) {
        self.device.release();

        let transition = Transition::CaptureAborted {
            has_takes: !self.takes.is_empty(),
        };
        match self.state.next(transition) {
            Some(to) => self.enter(to),
            None => debug!(state = ?self.state, "Nothing to abort"),
        }
    }

    #[track_caller]
    fn editor_mut(&mut self) -> CoreResult<&mut TrimEditor> {
        self.ensure_supported()?;
        self.guard(Transition::EditTrim)?;

        self.trim.as_mut().ok_or(SessionError::NoTakeSelected {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn guard(&self, transition: Transition) -> CoreResult<RecordingState> {
        self.state
            .next(transition)
            .ok_or_else(|| self.rejected(transition))
    }

    #[track_caller]
    fn rejected(&self, transition: Transition) -> SessionError {
        warn!(state = ?self.state, transition = ?transition, "Intent rejected");
        SessionError::InvalidTransition {
            from: self.state,
            transition,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    fn ensure_supported(&self) -> CoreResult<()> {
        match &self.unsupported {
            Some(reason) => Err(SessionError::UnsupportedEnvironment {
                reason: reason.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(()),
        }
    }

    #[track_caller]
    fn ensure_not_acquiring(&self) -> CoreResult<()> {
        if self.acquisition_pending {
            return Err(SessionError::AcquisitionPending {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Surfaces user-facing errors and passes defects back to the caller.
    fn absorb(&mut self, err: SessionError) -> CoreResult<()> {
        if err.class() == ErrorClass::Defect {
            return Err(err);
        }
        self.surface(&err);
        Ok(())
    }

    fn surface(&mut self, err: &SessionError) {
        let message = err.user_message();

        let severity = match err.class() {
            ErrorClass::Advisory => {
                warn!(error = %err, "Session advisory");
                Severity::Warning
            }
            ErrorClass::Cosmetic => {
                debug!(error = %err, "Cosmetic failure");
                return;
            }
            _ => {
                error!(error = %err, "Session error");
                Severity::Error
            }
        };

        self.error = Some(message.clone());
        self.events
            .push(SessionEvent::Advisory(Advisory::new(message, severity)));
    }

    fn enter(&mut self, to: RecordingState) {
        let from = self.state;
        self.state = to;

        if to.meters_audio() {
            if self.meter.is_none() {
                self.meter = Some(AudioMeter::new());
                self.analyser.reset();
            }
        } else {
            self.meter = None;
            self.reading = MeterReading::default();
        }

        if to == RecordingState::Countdown {
            if from != RecordingState::Countdown {
                self.countdown = Some(Countdown::new(self.config.countdown_secs));
            }
        } else {
            self.countdown = None;
        }

        if from == RecordingState::Countdown && to == RecordingState::Recording {
            self.timer = Some(RecordingTimer::new(
                self.config.max_duration_secs,
                &self.config.warning_thresholds_secs,
            ));
        } else if !to.is_capturing() {
            self.timer = None;
        }

        if to != RecordingState::Trimming {
            self.trim = None;
        }

        if from != to {
            info!(from = ?from, to = ?to, "Session state changed");
            self.events.push(SessionEvent::StateChanged { from, to });
        }
    }
}
