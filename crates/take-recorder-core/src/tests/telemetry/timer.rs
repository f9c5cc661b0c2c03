use crate::telemetry::{Countdown, RecordingTimer, TimerSignal};

/// WHAT: Thresholds at or above the limit never fire
/// WHY: They cannot be crossed from a fresh start
#[test]
fn given_threshold_above_limit_when_ticking_then_never_fires() {
    // Given: A 30s limit with a 60s threshold
    let mut timer = RecordingTimer::new(30, &[60, 10]);

    // When: Ticking to the limit
    let signals: Vec<TimerSignal> = (0..30).flat_map(|_| timer.tick()).collect();

    // Then: Only the 10s warning and the limit
    assert_eq!(
        signals,
        vec![
            TimerSignal::Warning { remaining_secs: 10 },
            TimerSignal::LimitReached
        ]
    );
}

/// WHAT: The limit is reported once and the clock stops at the limit
/// WHY: A late tick must not stop a second time
#[test]
fn given_limit_reached_when_ticking_more_then_silent() {
    // Given: A two-second timer run out
    let mut timer = RecordingTimer::new(2, &[]);
    timer.tick();
    assert_eq!(timer.tick(), vec![TimerSignal::LimitReached]);

    // When: Ticking again
    let late = timer.tick();

    // Then: Nothing, clock pinned at the limit
    assert!(late.is_empty());
    assert_eq!(timer.elapsed_secs(), 2);
    assert_eq!(timer.remaining_secs(), 0);
}

/// WHAT: The countdown reports elapsed on its last tick
/// WHY: Capture begins exactly when the countdown hits zero
#[test]
fn given_three_second_countdown_when_ticking_then_elapsed_on_third() {
    // Given: A three-second countdown
    let mut countdown = Countdown::new(3);

    // When / Then: Only the third tick finishes it
    assert!(!countdown.tick());
    assert!(!countdown.tick());
    assert!(countdown.tick());
    assert_eq!(countdown.remaining(), 0);
}
