use crate::{
    AppCommand, AppError, AppResult,
    config::Config,
    exporter::TakeExporter,
    media::WaveformFrameDecoder,
    microphone::{MicrophoneBackend, MicrophoneStream},
    presenter,
    toast::ToastQueue,
};

use std::{
    future::pending,
    io::{BufRead, Write},
    panic::Location,
    time::Duration,
};

use error_location::ErrorLocation;
use take_recorder_core::{
    AcquireFailure, AcquireFuture, Advisory, CoreResult, RecordingSession, RecordingState,
    SessionEvent, Severity, TakeId, Thumbnail, TimerSignal, TrimRange,
};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior, interval, sleep_until},
};
use tracing::{debug, error, info, instrument, warn};

type Session = RecordingSession<MicrophoneBackend>;
type ThumbnailResult = (TakeId, CoreResult<Thumbnail>);

/// Whether the main loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main application state.
///
/// Runs on a current-thread runtime because the microphone stream inside
/// the session is `!Send`. Stdin is read on a blocking thread and forwarded
/// line by line.
pub struct App {
    pub(crate) session: Session,
    pub(crate) exporter: TakeExporter,
    pub(crate) toasts: ToastQueue,
    pub(crate) meter_period: Duration,
    /// Pending microphone acquisition, awaited by the main loop.
    pub(crate) acquisition: Option<AcquireFuture<MicrophoneStream>>,
    /// When simulated playback of the selected take ends.
    pub(crate) playback_deadline: Option<Instant>,
    /// Set when the once-a-second clock must restart from now.
    pub(crate) clock_reset: bool,
}

impl App {
    pub(crate) fn new(session: Session, exporter: TakeExporter, config: &Config) -> Self {
        info!(directory = ?exporter.directory(), "Saved takes go to the export directory");

        Self {
            session,
            exporter,
            toasts: ToastQueue::new(Duration::from_millis(config.display.toast_duration_ms)),
            meter_period: Duration::from_secs(1) / config.display.meter_fps.max(1),
            acquisition: None,
            playback_deadline: None,
            clock_reset: false,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Take Recorder starting");

        // Stdin forwarding via single persistent blocking task.
        //
        // Shutdown: when line_rx is dropped (main loop breaks),
        // line_tx.blocking_send() fails on the next line, breaking the loop.
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);
        let stdin_handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
        });

        let (thumbnail_tx, mut thumbnail_rx) = mpsc::channel::<ThumbnailResult>(8);

        let mut clock = interval(Duration::from_secs(1));
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut meter = interval(self.meter_period);
        meter.set_missed_tick_behavior(MissedTickBehavior::Skip);

        println!("Take Recorder. Type 'help' for commands.");
        self.print_status();

        loop {
            if std::mem::take(&mut self.clock_reset) {
                clock.reset();
            }

            let toast_expiry = self.toasts.next_expiry();
            let playback_deadline = self.playback_deadline;

            tokio::select! {
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Stdin closed, shutting down");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<AppCommand>() {
                        Ok(command) => {
                            if self.dispatch(command).await == Flow::Quit {
                                info!("Shutdown requested");
                                break;
                            }
                        }
                        Err(e) => {
                            debug!(error = ?e, "Rejected input");
                            print_error(&e);
                        }
                    }
                }

                result = await_acquisition(&mut self.acquisition), if self.acquisition.is_some() => {
                    self.acquisition = None;
                    self.finish_acquisition(result);
                }

                _ = clock.tick() => {
                    self.on_clock_tick();
                }

                _ = meter.tick() => {
                    self.on_meter_tick();
                }

                Some((take_id, result)) = thumbnail_rx.recv() => {
                    self.session.attach_thumbnail(take_id, result);
                }

                _ = sleep_until(toast_expiry.unwrap_or_else(Instant::now)), if toast_expiry.is_some() => {
                    self.toasts.expire(Instant::now());
                }

                _ = sleep_until(playback_deadline.unwrap_or_else(Instant::now)), if playback_deadline.is_some() => {
                    self.playback_deadline = None;
                    let result = self.session.playback_ended();
                    self.report(result, "end playback");
                }
            }

            self.flush_events();
            self.spawn_thumbnail_jobs(&thumbnail_tx);
        }

        drop(line_rx);

        match tokio::time::timeout(Duration::from_millis(100), stdin_handle).await {
            Ok(Ok(())) => info!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => info!(
                "Stdin forwarder is blocked on a read, \
                     will be cleaned up on exit"
            ),
        }

        info!("Take Recorder shut down successfully");

        Ok(())
    }

    /// Applies one user command.
    #[instrument(skip(self))]
    async fn dispatch(&mut self, command: AppCommand) -> Flow {
        match command {
            AppCommand::Record => match self.session.request_acquisition() {
                Ok(acquisition) => {
                    println!("Waiting for microphone...");
                    self.acquisition = Some(acquisition);
                }
                Err(e) => print_rejection("record", &e.into()),
            },
            AppCommand::Stop => {
                let result = self.session.stop();
                self.report(result, "stop");
            }
            AppCommand::Pause => {
                let result = self.session.pause();
                self.report(result, "pause");
            }
            AppCommand::Resume => {
                let result = self.session.resume();
                self.report(result, "resume");
            }
            AppCommand::Play(number) => {
                let result = match self.resolve(number) {
                    Ok(id) => self.session.play(id).map_err(AppError::from),
                    Err(e) => Err(e),
                };
                match result {
                    Ok(_) => self.schedule_playback_end(),
                    Err(e) => print_rejection("play", &e),
                }
            }
            AppCommand::PlaybackEnded => {
                self.playback_deadline = None;
                let result = self.session.playback_ended();
                self.report(result, "end playback");
            }
            AppCommand::Select(number) => {
                let result = self
                    .resolve_number(number)
                    .and_then(|id| Ok(self.session.select(id)?));
                if let Err(e) = result {
                    print_rejection("select", &e);
                }
            }
            AppCommand::Delete(number) => {
                let result = self.resolve(number).and_then(|id| {
                    let id = id.ok_or_else(|| AppError::InvalidCommand {
                        input: "delete".to_string(),
                        reason: "no take selected".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                    Ok(self.session.delete(id)?)
                });
                if let Err(e) = result {
                    print_rejection("delete", &e);
                }
            }
            AppCommand::DeleteAll => {
                let result = self.session.delete_all();
                self.report(result, "delete all takes");
            }
            AppCommand::Trim => match self.session.start_trim() {
                Ok(range) => println!(
                    "Trimming {:.2}s - {:.2}s. Use trim-start/trim-end, then trim-apply.",
                    range.start, range.end
                ),
                Err(e) => print_rejection("trim", &e.into()),
            },
            AppCommand::TrimStart(secs) => {
                let result = self.session.set_trim_start(secs);
                self.report_trim(result);
            }
            AppCommand::TrimEnd(secs) => {
                let result = self.session.set_trim_end(secs);
                self.report_trim(result);
            }
            AppCommand::TrimReset => {
                let result = self.session.reset_trim();
                self.report_trim(result);
            }
            AppCommand::TrimCancel => {
                let result = self.session.cancel_trim();
                self.report(result, "cancel trim");
            }
            AppCommand::TrimApply => {
                if let Err(e) = self.session.apply_trim() {
                    print_rejection("apply trim", &e.into());
                }
            }
            AppCommand::Save => {
                if let Err(e) = self.save().await {
                    error!(error = ?e, "Failed to save take");
                    self.show(Advisory::new(
                        format!("Failed to save take: {}", describe(&e)),
                        Severity::Error,
                    ));
                }
            }
            AppCommand::Status => self.print_status(),
            AppCommand::Help => println!("{}", presenter::render_help()),
            AppCommand::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn finish_acquisition(&mut self, result: Result<MicrophoneStream, AcquireFailure>) {
        let result = self.session.complete_acquisition(result);
        self.report(result, "start recording");

        if self.session.state() == RecordingState::Countdown {
            if let Some(remaining) = self.session.countdown_remaining() {
                println!("{}...", remaining);
            }
        }
    }

    fn on_clock_tick(&mut self) {
        match self.session.state() {
            RecordingState::Countdown => {
                let result = self.session.tick_countdown();
                self.report(result, "count down");
                if let Some(remaining) = self.session.countdown_remaining() {
                    println!("{}...", remaining);
                }
            }
            RecordingState::Recording => {
                let signals = self.session.tick_timer();
                if signals.contains(&TimerSignal::LimitReached) {
                    let result = self.session.handle_time_limit();
                    self.report(result, "stop at the time limit");
                }
            }
            _ => {}
        }
    }

    fn on_meter_tick(&mut self) {
        let state = self.session.poll_recorder();
        if !state.holds_device() {
            return;
        }

        if let Some(reading) = self.session.meter_frame() {
            let elapsed = self.session.recorded_duration().as_secs();
            print!(
                "\r{} {}  ",
                presenter::format_clock(u32::try_from(elapsed).unwrap_or(u32::MAX)),
                presenter::render_meter(&reading)
            );
            let _ = std::io::stdout().flush();
        }
    }

    /// Prints and queues everything the session reported since last time.
    fn flush_events(&mut self) {
        let events = self.session.drain_events();
        if events.is_empty() {
            return;
        }

        let snapshot = self.session.snapshot();
        for event in events {
            match event {
                SessionEvent::Advisory(advisory) => self.show(advisory),
                SessionEvent::StateChanged { from, to } => {
                    if matches!(to, RecordingState::Countdown | RecordingState::Recording) {
                        self.clock_reset = true;
                    }
                    if from == RecordingState::Playing && to != RecordingState::Playing {
                        self.playback_deadline = None;
                    }
                    if let Some(line) = presenter::render_event(&event, &snapshot) {
                        println!("\n{}", line);
                    }
                }
                other => {
                    if let Some(line) = presenter::render_event(&other, &snapshot) {
                        println!("{}", line);
                    }
                }
            }
        }
    }

    /// Renders queued thumbnails off the runtime thread.
    fn spawn_thumbnail_jobs(&mut self, results: &mpsc::Sender<ThumbnailResult>) {
        for job in self.session.take_thumbnail_jobs() {
            let results = results.clone();
            tokio::task::spawn_blocking(move || {
                let result = job.render(&WaveformFrameDecoder);
                if results.blocking_send((job.take_id, result)).is_err() {
                    debug!(take_id = %job.take_id, "Thumbnail result dropped after shutdown");
                }
            });
        }
    }

    async fn save(&mut self) -> AppResult<()> {
        let request = self.session.save()?;
        let path = self.exporter.export(request).await?;

        self.show(Advisory::new(
            format!("Saved to {}", path.display()),
            Severity::Success,
        ));

        Ok(())
    }

    /// Plays the selected take for its declared duration.
    fn schedule_playback_end(&mut self) {
        if let Some(take) = self.session.selected_take() {
            let duration = Duration::from_secs_f64(take.duration_secs().max(0.0));
            self.playback_deadline = Some(Instant::now() + duration);
            println!("Playing take ({:.1}s)...", take.duration_secs());
        }
    }

    /// Maps an optional take number to a take id; `None` keeps the
    /// selection.
    fn resolve(&self, number: Option<usize>) -> AppResult<Option<TakeId>> {
        match number {
            Some(number) => self.resolve_number(number).map(Some),
            None => Ok(self.session.takes().selected()),
        }
    }

    #[track_caller]
    fn resolve_number(&self, number: usize) -> AppResult<TakeId> {
        self.session
            .take_by_number(number)
            .ok_or_else(|| AppError::InvalidCommand {
                input: number.to_string(),
                reason: format!("there is no take {}", number),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn show(&mut self, advisory: Advisory) {
        match advisory.severity {
            Severity::Error => warn!(message = %advisory.message, "Error advisory"),
            _ => debug!(message = %advisory.message, "Advisory"),
        }
        let id = self.toasts.push(advisory);
        if let Some(toast) = self.toasts.iter().find(|toast| toast.id == id) {
            println!("\n{}", presenter::render_toast(toast));
        }
    }

    fn report<T>(&self, result: CoreResult<T>, action: &str) {
        if let Err(e) = result {
            print_rejection(action, &e.into());
        }
    }

    fn report_trim(&self, result: CoreResult<TrimRange>) {
        match result {
            Ok(range) => println!(
                "Trim: {:.2}s - {:.2}s ({:.2}s kept)",
                range.start,
                range.end,
                range.length()
            ),
            Err(e) => print_rejection("edit trim", &e.into()),
        }
    }

    fn print_status(&self) {
        println!("{}", presenter::render_status(&self.session.snapshot()));
        if self.toasts.is_empty() {
            return;
        }
        for toast in self.toasts.iter() {
            println!("  {}", presenter::render_toast(toast));
        }
    }
}

/// Resolves once the pending acquisition finishes; never resolves without
/// one.
async fn await_acquisition(
    acquisition: &mut Option<AcquireFuture<MicrophoneStream>>,
) -> Result<MicrophoneStream, AcquireFailure> {
    match acquisition.as_mut() {
        Some(future) => future.await,
        None => pending().await,
    }
}

fn print_rejection(action: &str, e: &AppError) {
    debug!(action, error = ?e, "Command rejected");
    println!("Cannot {}: {}", action, describe(e));
}

fn print_error(e: &AppError) {
    println!("{}", describe(e));
}

/// User-facing message without the call-site location.
pub(crate) fn describe(e: &AppError) -> String {
    match e {
        AppError::Session { source, .. } => source.user_message(),
        AppError::InvalidCommand { input, reason, .. } => format!("'{}': {}", input, reason),
        AppError::ExportFailed { reason, .. } | AppError::ConfigError { reason, .. } => {
            reason.clone()
        }
        AppError::IoError { source, .. } => source.to_string(),
    }
}
