//! Plain-text rendering of session state for the terminal.
//!
//! Everything here is a pure function of its input so the app loop decides
//! when to print.

use crate::{app_command::COMMAND_HELP, toast::Toast};

use chrono::Local;
use take_recorder_core::{
    MeterReading, RecordingState, SessionEvent, SessionSnapshot, Severity, TakeId, TakeSummary,
};

/// Width of the meter bar in characters.
pub(crate) const METER_WIDTH: usize = 32;

/// `m:ss` clock.
pub(crate) fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Short label for a state.
pub(crate) fn state_label(state: RecordingState) -> &'static str {
    match state {
        RecordingState::Idle => "idle",
        RecordingState::Countdown => "get ready",
        RecordingState::Recording => "recording",
        RecordingState::Paused => "paused",
        RecordingState::Recorded => "recorded",
        RecordingState::Playing => "playing",
        RecordingState::Trimming => "trimming",
    }
}

/// Single-line level bar with the peak marker.
pub(crate) fn render_meter(reading: &MeterReading) -> String {
    let filled = bar_position(reading.level);
    let peak = bar_position(reading.peak);

    let bar: String = (0..METER_WIDTH)
        .map(|i| {
            if i < filled {
                '#'
            } else if peak > 0 && i == peak - 1 {
                '|'
            } else {
                '-'
            }
        })
        .collect();

    let mut line = format!("[{}] {:>3.0}", bar, reading.level);
    if reading.low {
        line.push_str("  low audio, speak up");
    }
    line
}

/// Cells covered by a 0-100 meter value.
fn bar_position(value: f32) -> usize {
    let cells = (value.clamp(0.0, 100.0) / 100.0 * METER_WIDTH as f32).ceil();
    (cells as usize).min(METER_WIDTH)
}

/// Multi-line status block.
pub(crate) fn render_status(snapshot: &SessionSnapshot) -> String {
    let mut lines = Vec::new();

    if !snapshot.supported {
        lines.push("Recording is not available here.".to_string());
        if let Some(error) = &snapshot.error {
            lines.push(format!("  {}", error));
        }
        return lines.join("\n");
    }

    let mut headline = format!("State: {}", state_label(snapshot.state));
    if snapshot.acquisition_pending {
        headline.push_str(" (waiting for microphone)");
    }
    if let Some(remaining) = snapshot.countdown_remaining {
        headline.push_str(&format!("  {}...", remaining));
    }
    if let (Some(elapsed), Some(remaining)) = (snapshot.elapsed_secs, snapshot.remaining_secs) {
        headline.push_str(&format!(
            "  {} / {} ({} left)",
            format_clock(elapsed),
            format_clock(snapshot.max_duration_secs),
            format_clock(remaining)
        ));
    }
    lines.push(headline);

    if let Some(error) = &snapshot.error {
        lines.push(format!("Error: {}", error));
    }

    if let Some(range) = snapshot.trim {
        lines.push(format!(
            "Trim: {:.2}s - {:.2}s ({:.2}s kept)",
            range.start,
            range.end,
            range.length()
        ));
    }

    if snapshot.takes.is_empty() {
        lines.push("No takes yet. Type 'record' to start.".to_string());
    } else {
        lines.push(format!("Takes ({}):", snapshot.takes.len()));
        lines.extend(snapshot.takes.iter().map(render_take));
    }

    lines.join("\n")
}

/// One take line, e.g. `* Take 2  0:07  14:02:11  audio/wav  224 KB`.
pub(crate) fn render_take(take: &TakeSummary) -> String {
    let marker = if take.selected { '*' } else { ' ' };
    // Durations are whole seconds on the clock; sub-second detail is noise.
    let secs = take.duration_secs.max(0.0).round() as u32;

    let mut line = format!(
        "{} Take {:<3} {}  {}  {}  {}",
        marker,
        take.number,
        format_clock(secs),
        take.created_at.with_timezone(&Local).format("%H:%M:%S"),
        take.mime,
        format_bytes(take.bytes)
    );
    if let Some(window) = take.playback_window {
        line.push_str(&format!(
            "  [{:.2}s-{:.2}s]",
            window.start_secs, window.end_secs
        ));
    }
    if !take.has_thumbnail {
        line.push_str("  (no preview)");
    }
    line
}

fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{} KB", b / KB),
        b => format!("{} B", b),
    }
}

/// Line for an event worth showing outside the toast area, if any.
///
/// Advisories are shown as toasts and thumbnails silently refresh the take
/// list, so neither produces a line here.
pub(crate) fn render_event(event: &SessionEvent, snapshot: &SessionSnapshot) -> Option<String> {
    let take_number = |id: TakeId| {
        snapshot
            .takes
            .iter()
            .find(|take| take.id == id)
            .map(|take| take.number)
    };

    match event {
        SessionEvent::StateChanged { from, to } => Some(format!(
            "{} -> {}",
            state_label(*from),
            state_label(*to)
        )),
        SessionEvent::TakeCommitted { take_id } => Some(match take_number(*take_id) {
            Some(number) => format!("Take {} recorded", number),
            None => "Take recorded".to_string(),
        }),
        SessionEvent::TakeDeleted { .. } => Some("Take deleted".to_string()),
        SessionEvent::TrimApplied { take_id, .. } => Some(match take_number(*take_id) {
            Some(number) => format!("Trimmed copy saved as Take {}", number),
            None => "Trimmed copy saved".to_string(),
        }),
        SessionEvent::TimeLimitReached => Some("Recording limit reached".to_string()),
        SessionEvent::Advisory(_) | SessionEvent::ThumbnailAttached { .. } => None,
    }
}

/// Toast line with a severity tag.
pub(crate) fn render_toast(toast: &Toast) -> String {
    let tag = match toast.severity {
        Severity::Info => "info",
        Severity::Success => " ok ",
        Severity::Warning => "warn",
        Severity::Error => "FAIL",
    };
    format!("[{}] {}", tag, toast.message)
}

/// The command list.
pub(crate) fn render_help() -> String {
    let width = COMMAND_HELP
        .iter()
        .map(|(command, _)| command.len())
        .max()
        .unwrap_or(0);

    COMMAND_HELP
        .iter()
        .map(|(command, description)| format!("  {:<width$}  {}", command, description))
        .collect::<Vec<_>>()
        .join("\n")
}
