use crate::{
    Advisory, MeterReading, RecordingSession, RecordingState, SessionConfig, SessionEvent,
    Severity, TimerSignal,
    tests::support::{FakeBackend, start_recording},
};

use std::{f32::consts::PI, time::Duration};

fn tone(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| 0.5 * (2.0 * PI * 440.0 * n as f32 / 48_000.0).sin())
        .collect()
}

/// WHAT: The meter runs only while the device is held
/// WHY: A stale meter must not keep reading a released stream
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_tone_when_metering_across_states_then_active_only_while_capturing() {
    // Given: A backend producing a steady tone
    let backend = FakeBackend::with_samples(tone(2048));
    let mut session = RecordingSession::new(backend, SessionConfig::default());
    assert_eq!(session.meter_frame(), None);

    // When: Metering during countdown and recording, then after stop
    session.begin_countdown().await.unwrap();
    let during_countdown = session.meter_frame();
    for _ in 0..3 {
        session.tick_countdown().unwrap();
    }
    let during_recording = session.meter_frame().unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    session.stop().unwrap();
    let after_stop = session.meter_frame();

    // Then: Readings while held, nothing and a zeroed snapshot afterwards
    assert!(during_countdown.is_some());
    assert!(during_recording.level > 0.0);
    assert!(during_recording.peak >= during_recording.level);
    assert_eq!(after_stop, None);
    assert_eq!(session.snapshot().meter, MeterReading::default());
}

/// WHAT: A stream that overstates its sample count still yields a reading
/// WHY: Backend bookkeeping errors must not take down the session
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_stream_overstating_samples_when_metering_then_reading_produced() {
    // Given: A recording whose stream reports more samples than it wrote
    let backend = FakeBackend {
        overstate_samples: true,
        ..FakeBackend::with_samples(tone(2048))
    };
    let mut session = RecordingSession::new(backend, SessionConfig::default());
    start_recording(&mut session).await;

    // When: Metering
    let reading = session.meter_frame().unwrap();

    // Then: A normal reading from the samples actually written
    assert!(reading.level > 0.0);
    assert_eq!(session.state(), RecordingState::Recording);
}

/// WHAT: Warnings fire once each and the clock freezes while paused
/// WHY: Repeated toasts are noise and paused time is not recorded time
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_thresholds_when_ticking_with_pause_then_each_warning_once() {
    // Given: A twelve-second limit with warnings at 10s and 5s
    let config = SessionConfig {
        max_duration_secs: 12,
        warning_thresholds_secs: vec![10, 5],
        ..SessionConfig::default()
    };
    let mut session = RecordingSession::new(FakeBackend::new(), config);
    start_recording(&mut session).await;
    session.drain_events();

    // When: Two ticks, a paused stretch, then five more ticks
    let mut signals = Vec::new();
    for _ in 0..2 {
        signals.extend(session.tick_timer());
    }
    session.pause().unwrap();
    for _ in 0..10 {
        signals.extend(session.tick_timer());
    }
    assert_eq!(session.snapshot().elapsed_secs, Some(2));
    session.resume().unwrap();
    for _ in 0..5 {
        signals.extend(session.tick_timer());
    }

    // Then: Exactly one warning per threshold, as error-level advisories
    assert_eq!(
        signals,
        vec![
            TimerSignal::Warning { remaining_secs: 10 },
            TimerSignal::Warning { remaining_secs: 5 },
        ]
    );
    let advisories: Vec<Advisory> = session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            SessionEvent::Advisory(advisory) => Some(advisory),
            _ => None,
        })
        .collect();
    assert_eq!(
        advisories,
        vec![
            Advisory::new("10 seconds remaining", Severity::Error),
            Advisory::new("5 seconds remaining", Severity::Error),
        ]
    );
    assert_eq!(session.state(), RecordingState::Recording);
    assert_eq!(session.snapshot().remaining_secs, Some(5));
}
