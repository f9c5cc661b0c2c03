use crate::{
    RecordingSession, RecordingState, SessionConfig, SessionError, SessionEvent, TrimCodec,
    TrimRange,
    takes::{PlaybackWindow, Take, TrimmedArtifact},
    tests::support::{FakeBackend, record_take, session},
};

struct BrokenCodec;

impl TrimCodec for BrokenCodec {
    fn trim(&self, _source: &Take, _range: TrimRange) -> Result<TrimmedArtifact, String> {
        Err("demuxer unavailable".to_string())
    }
}

/// WHAT: Applying a trim adds a new selected take and keeps the source
/// WHY: Trimming is non-destructive
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_trim_range_when_applying_then_new_take_added_and_source_kept() {
    // Given: A ten-second take in the trim editor
    let mut session = session();
    record_take(&mut session, 10).await;
    let source = session.takes().selected().unwrap();
    let opened = session.start_trim().unwrap();
    assert_eq!(opened, TrimRange { start: 0.0, end: 10.0 });

    // When: Keeping 2s..8s
    session.set_trim_start(2.0).unwrap();
    session.set_trim_end(8.0).unwrap();
    let trimmed = session.apply_trim().unwrap();

    // Then: New selected six-second take windowed into the source bytes
    assert_eq!(session.state(), RecordingState::Recorded);
    assert_eq!(session.takes().len(), 2);
    assert_eq!(session.takes().selected(), Some(trimmed));
    assert!(session.takes().get(source).is_ok());

    let take = session.takes().get(trimmed).unwrap();
    assert_eq!(take.duration_secs(), 6.0);
    assert_eq!(
        take.playback_window(),
        Some(PlaybackWindow {
            start_secs: 2.0,
            end_secs: 8.0
        })
    );
    assert!(
        take.artifact()
            .shares_payload_with(session.takes().get(source).unwrap().artifact())
    );
    assert!(session.drain_events().contains(&SessionEvent::TrimApplied {
        source,
        take_id: trimmed
    }));
}

/// WHAT: Trimming an already trimmed take composes the windows
/// WHY: Metadata-only trims point into the original payload
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_trimmed_take_when_trimming_again_then_window_offsets_compose() {
    // Given: A 2s..8s trim of a ten-second take
    let mut session = session();
    record_take(&mut session, 10).await;
    session.start_trim().unwrap();
    session.set_trim_start(2.0).unwrap();
    session.set_trim_end(8.0).unwrap();
    session.apply_trim().unwrap();

    // When: Trimming the result to 1s..3s
    let opened = session.start_trim().unwrap();
    session.set_trim_start(1.0).unwrap();
    session.set_trim_end(3.0).unwrap();
    let id = session.apply_trim().unwrap();

    // Then: The editor saw six seconds and the window lands at 3s..5s
    assert_eq!(opened.end, 6.0);
    let take = session.takes().get(id).unwrap();
    assert_eq!(take.duration_secs(), 2.0);
    assert_eq!(
        take.playback_window(),
        Some(PlaybackWindow {
            start_secs: 3.0,
            end_secs: 5.0
        })
    );
}

/// WHAT: A zero-length range is rejected and the editor stays open
/// WHY: Empty takes are meaningless
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_zero_length_range_when_applying_then_empty_trim_range() {
    // Given: No minimum separation and a start dragged to the end
    let config = SessionConfig {
        min_trim_separation_secs: 0.0,
        ..SessionConfig::default()
    };
    let mut session = RecordingSession::new(FakeBackend::new(), config);
    record_take(&mut session, 5).await;
    session.start_trim().unwrap();
    session.set_trim_start(5.0).unwrap();

    // When: Applying
    let result = session.apply_trim();

    // Then: Rejected, still trimming, no new take
    assert!(matches!(result, Err(SessionError::EmptyTrimRange { .. })));
    assert_eq!(session.state(), RecordingState::Trimming);
    assert_eq!(session.takes().len(), 1);
}

/// WHAT: Cancelling discards the range and leaves takes untouched
/// WHY: Trim previews must be free to abandon
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_open_editor_when_cancelling_then_recorded_without_changes() {
    // Given: An editor with a moved start
    let mut session = session();
    record_take(&mut session, 4).await;
    session.start_trim().unwrap();
    session.set_trim_start(1.5).unwrap();

    // When: Cancelling
    let state = session.cancel_trim().unwrap();

    // Then: Back to Recorded, no range, one take
    assert_eq!(state, RecordingState::Recorded);
    assert_eq!(session.trim_range(), None);
    assert_eq!(session.takes().len(), 1);
}

/// WHAT: Moving trim handles outside Trimming is rejected
/// WHY: Handles only exist while the editor is open
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recorded_session_when_moving_handle_then_invalid_transition() {
    // Given: A take but no editor
    let mut session = session();
    record_take(&mut session, 3).await;

    // When: Moving the end handle
    let result = session.set_trim_end(1.0);

    // Then: InvalidTransition from Recorded
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition {
            from: RecordingState::Recorded,
            ..
        })
    ));
}

/// WHAT: Selecting another take while trimming closes the editor
/// WHY: The range belongs to the take it was opened on
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_open_editor_when_selecting_other_take_then_editor_discarded() {
    // Given: Two takes, trimming the newest
    let mut session = session();
    record_take(&mut session, 2).await;
    let older = session.takes().selected().unwrap();
    record_take(&mut session, 3).await;
    session.start_trim().unwrap();

    // When: Selecting the older take
    session.select(older).unwrap();

    // Then: No editor remains
    assert_eq!(session.state(), RecordingState::Recorded);
    assert_eq!(session.snapshot().trim, None);
}

/// WHAT: A failing trim codec surfaces an error and keeps the editor open
/// WHY: The user can retry or cancel
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_failing_codec_when_applying_then_trim_failed_and_still_trimming() {
    // Given: A session whose codec always fails
    let mut session = RecordingSession::new(FakeBackend::new(), SessionConfig::default())
        .with_trim_codec(BrokenCodec);
    record_take(&mut session, 3).await;
    session.start_trim().unwrap();

    // When: Applying
    let result = session.apply_trim();

    // Then: TrimFailed, message shown, editor open
    assert!(matches!(result, Err(SessionError::TrimFailed { .. })));
    assert_eq!(session.error(), Some("Trimming failed. Please try again."));
    assert_eq!(session.state(), RecordingState::Trimming);
}
