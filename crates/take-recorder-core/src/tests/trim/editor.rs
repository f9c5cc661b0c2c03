use crate::{SessionError, TakeId, trim::TrimEditor};

use uuid::Uuid;

fn editor(duration: f64) -> TrimEditor {
    TrimEditor::start(TakeId::from(Uuid::new_v4()), duration, 0.1)
}

fn assert_invariant(editor: &TrimEditor) {
    let range = editor.range();
    assert!(range.start >= 0.0, "{range:?}");
    assert!(range.start <= range.end, "{range:?}");
    assert!(range.end <= editor.duration(), "{range:?}");
}

/// WHAT: 0 <= start <= end <= duration holds after every handle move
/// WHY: Handles can be dragged anywhere, including past each other
#[test]
fn given_arbitrary_handle_moves_when_editing_then_invariant_holds() {
    // Given: A ten-second editor
    let mut editor = editor(10.0);
    let moves = [
        (true, 4.0),
        (false, 3.0),
        (true, 12.0),
        (false, -5.0),
        (true, -1.0),
        (false, 10.5),
        (true, 9.95),
        (false, 0.0),
    ];

    for (is_start, seconds) in moves {
        // When: Moving a handle
        if is_start {
            editor.set_start(seconds);
        } else {
            editor.set_end(seconds);
        }

        // Then: The invariant holds
        assert_invariant(&editor);
    }
}

/// WHAT: Dragging the end below the start stops at the minimum separation
/// WHY: The kept section never collapses while editing
#[test]
fn given_start_at_four_when_dragging_end_lower_then_clamped_above_start() {
    // Given: Start at 4s
    let mut editor = editor(10.0);
    editor.set_start(4.0);

    // When: Dragging the end to 1s
    let range = editor.set_end(1.0);

    // Then: End sits at start + separation
    assert!((range.end - 4.1).abs() < 1e-9);
}

/// WHAT: Non-finite handle positions are ignored
/// WHY: Slider glitches must not poison the range
#[test]
fn given_nan_and_infinity_when_setting_then_range_unchanged() {
    // Given: A range of 2s..8s
    let mut editor = editor(10.0);
    editor.set_start(2.0);
    editor.set_end(8.0);
    let before = editor.range();

    // When: Feeding non-finite values
    editor.set_start(f64::NAN);
    editor.set_end(f64::INFINITY);

    // Then: Nothing moved
    assert_eq!(editor.range(), before);
}

/// WHAT: Reset restores the whole take and apply accepts it
/// WHY: Users can back out of their handle moves
#[test]
#[allow(clippy::unwrap_used)]
fn given_moved_handles_when_resetting_then_full_range() {
    // Given: Moved handles
    let mut editor = editor(6.0);
    editor.set_start(1.0);
    editor.set_end(2.0);

    // When: Resetting and applying
    editor.reset();
    let applied = editor.apply().unwrap();

    // Then: Whole take
    assert_eq!(applied.start, 0.0);
    assert_eq!(applied.end, 6.0);
    assert_eq!(applied.length(), 6.0);
}

/// WHAT: A zero-length take cannot be applied
/// WHY: Empty trims are rejected
#[test]
fn given_zero_duration_when_applying_then_empty_trim_range() {
    // Given / When: An editor over nothing
    let result = editor(0.0).apply();

    // Then: EmptyTrimRange
    assert!(matches!(result, Err(SessionError::EmptyTrimRange { .. })));
}
