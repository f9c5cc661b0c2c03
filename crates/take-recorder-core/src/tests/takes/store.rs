use crate::{
    SessionError,
    device::Artifact,
    takes::{PlaybackWindow, TakeStore, TrimmedArtifact},
};

use std::time::Duration;

fn artifact(bytes: &[u8]) -> Artifact {
    Artifact::new(bytes.to_vec(), "video/webm")
}

/// WHAT: Committed takes are listed newest first and numbered oldest-first
/// WHY: "Take 1" is always the first recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_three_commits_when_summarising_then_newest_first_with_stable_numbers() {
    // Given: Three commits
    let mut store = TakeStore::new();
    let first = store.commit(artifact(b"a"), Duration::from_secs(1)).id();
    store.commit(artifact(b"b"), Duration::from_secs(2));
    let third = store.commit(artifact(b"c"), Duration::from_secs(3)).id();

    // When: Summarising
    let summaries = store.summaries();

    // Then: Ordered newest first, numbered from the oldest, newest selected
    let numbers: Vec<usize> = summaries.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
    assert_eq!(summaries[0].id, third);
    assert!(summaries[0].selected);
    assert_eq!(store.take_by_number(1), Some(first));
    assert_eq!(store.take_by_number(0), None);
    assert_eq!(store.take_by_number(4), None);
}

/// WHAT: Replace inserts a new selected take and carries the source forward
/// WHY: Trims are additive
#[test]
#[allow(clippy::unwrap_used)]
fn given_source_take_when_replacing_then_new_take_first_and_source_kept() {
    // Given: One take
    let mut store = TakeStore::new();
    let source = store.commit(artifact(b"abcdef"), Duration::from_secs(6)).id();

    // When: Replacing with a windowed copy
    let trimmed = TrimmedArtifact {
        artifact: artifact(b"abcdef"),
        window: Some(PlaybackWindow {
            start_secs: 1.0,
            end_secs: 4.0,
        }),
    };
    let id = store.replace(source, trimmed, 3.0).unwrap().id();

    // Then: Two takes, new one selected and first
    assert_eq!(store.len(), 2);
    assert_eq!(store.selected(), Some(id));
    assert_eq!(store.takes()[0].id(), id);
    assert_eq!(store.takes()[1].id(), source);
    assert_eq!(store.live_handles(), 2);
}

/// WHAT: Replacing an unknown source fails without adding anything
/// WHY: A trim of a deleted take must not appear
#[test]
#[allow(clippy::unwrap_used)]
fn given_deleted_source_when_replacing_then_unknown_take() {
    // Given: A take that was deleted
    let mut store = TakeStore::new();
    let source = store.commit(artifact(b"x"), Duration::from_secs(1)).id();
    store.delete(source).unwrap();

    // When: Replacing it
    let result = store.replace(
        source,
        TrimmedArtifact {
            artifact: artifact(b"x"),
            window: None,
        },
        0.5,
    );

    // Then: UnknownTake and still empty
    assert!(matches!(result, Err(SessionError::UnknownTake { .. })));
    assert!(store.is_empty());
}

/// WHAT: Dropping the store releases every playback handle
/// WHY: Handles are released exactly once, on drop
#[test]
#[allow(clippy::unwrap_used)]
fn given_selected_handle_when_deleting_then_ledger_balances() {
    // Given: Two takes, one selected through its handle
    let mut store = TakeStore::new();
    let first = store.commit(artifact(b"1"), Duration::from_secs(1)).id();
    store.commit(artifact(b"2"), Duration::from_secs(1));
    let uri = store.select(first).unwrap().uri().to_string();

    // When: Deleting the selected take
    let deletion = store.delete(first).unwrap();

    // Then: Selection moved, one handle left, uri scheme intact
    assert!(deletion.was_selected);
    assert_eq!(deletion.remaining, 1);
    assert!(uri.starts_with("take:"));
    assert_eq!(store.live_handles(), 1);
    assert_eq!(store.delete_all(), 1);
    assert_eq!(store.live_handles(), 0);
}
