use crate::{
    AcquireFailure, Capabilities, RecordingSession, RecordingState, SessionConfig, SessionError,
    tests::support::{FakeBackend, record_take, session},
};

use std::sync::atomic::Ordering;

/// WHAT: A second acquisition request while one is pending is rejected, not queued
/// WHY: Only one device request may be in flight
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_pending_acquisition_when_requesting_again_then_acquisition_pending() {
    // Given: An outstanding acquisition
    let mut session = session();
    let pending = session.request_acquisition().unwrap();
    assert!(session.acquisition_pending());

    // When: Requesting again and trying to play
    let again = session.request_acquisition();
    let play = session.play(None);

    // Then: Both are rejected while the first completes normally
    assert!(matches!(again, Err(SessionError::AcquisitionPending { .. })));
    assert!(matches!(play, Err(SessionError::AcquisitionPending { .. })));

    let state = session.complete_acquisition(pending.await).unwrap();
    assert_eq!(state, RecordingState::Countdown);
    assert!(!session.acquisition_pending());
    assert_eq!(session.backend().acquisitions.load(Ordering::Acquire), 1);
}

/// WHAT: Permission denial leaves the state unchanged and fills the error slot
/// WHY: The user must be told how to recover
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_denied_permission_when_beginning_then_idle_with_message() {
    // Given: A backend that refuses access
    let backend = FakeBackend::refusing(AcquireFailure::NotAllowed);
    let mut session = RecordingSession::new(backend, SessionConfig::default());

    // When: Beginning the countdown
    let state = session.begin_countdown().await.unwrap();

    // Then: Still idle, nothing held, retry possible
    assert_eq!(state, RecordingState::Idle);
    assert_eq!(
        session.error(),
        Some("Camera access denied. Please grant camera permissions and try again.")
    );
    assert_eq!(session.backend().live_tracks(), 0);
    assert!(!session.acquisition_pending());
}

/// WHAT: An unreadable device maps to the busy-device message
/// WHY: Another application holding the camera is the common cause
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_unreadable_device_when_beginning_then_busy_message() {
    // Given: A backend whose device is in use
    let backend = FakeBackend::refusing(AcquireFailure::NotReadable);
    let mut session = RecordingSession::new(backend, SessionConfig::default());

    // When: Beginning the countdown
    session.begin_countdown().await.unwrap();

    // Then: The busy message is shown
    assert_eq!(
        session.error(),
        Some("Camera is already in use by another application.")
    );
}

/// WHAT: An insecure context is reported but acquisition is still attempted
/// WHY: Some platforms still grant access outside secure contexts
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_insecure_context_when_beginning_then_advisory_then_countdown() {
    // Given: An environment without a secure context
    let backend = FakeBackend::with_capabilities(Capabilities {
        media_devices: true,
        recorder: true,
        secure_context: false,
    });
    let mut session = RecordingSession::new(backend, SessionConfig::default());
    assert!(session.is_supported());
    assert_eq!(
        session.error(),
        Some("Camera access requires HTTPS. Please use HTTPS or localhost.")
    );

    // When: Beginning the countdown
    let state = session.begin_countdown().await.unwrap();

    // Then: Acquisition went ahead
    assert_eq!(state, RecordingState::Countdown);
}

/// WHAT: A missing recorder makes every intent fail with UnsupportedEnvironment
/// WHY: The fatal class blocks the widget permanently
#[tokio::test(start_paused = true)]
async fn given_missing_recorder_when_issuing_intents_then_all_rejected() {
    // Given: An environment without a recorder
    let backend = FakeBackend::with_capabilities(Capabilities {
        media_devices: true,
        recorder: false,
        secure_context: true,
    });
    let mut session = RecordingSession::new(backend, SessionConfig::default());

    // When: Issuing several intents
    let begin = session.begin_countdown().await;
    let trim = session.start_trim();
    let delete_all = session.delete_all();
    session.clear_error();

    // Then: All are rejected and the message stays
    assert!(matches!(
        begin,
        Err(SessionError::UnsupportedEnvironment { .. })
    ));
    assert!(matches!(
        trim,
        Err(SessionError::UnsupportedEnvironment { .. })
    ));
    assert!(matches!(
        delete_all,
        Err(SessionError::UnsupportedEnvironment { .. })
    ));
    assert!(!session.snapshot().supported);
    assert_eq!(
        session.error(),
        Some(
            "This environment doesn't support video recording. \
             Please use a supported device or browser."
        )
    );
    assert_eq!(session.backend().acquisitions.load(Ordering::Acquire), 0);
}

/// WHAT: Beginning a countdown during playback is rejected
/// WHY: Playback must be ended or a take selected first
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_playing_take_when_requesting_acquisition_then_invalid_transition() {
    // Given: A take being played
    let mut session = session();
    record_take(&mut session, 2).await;
    session.play(None).unwrap();

    // When: Requesting acquisition
    let result = session.request_acquisition();

    // Then: Rejected from Playing
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition {
            from: RecordingState::Playing,
            ..
        })
    ));
}
