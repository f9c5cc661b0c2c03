use crate::{AppError, AppResult};

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands read from stdin and dispatched by the main application.
///
/// Take numbers are the "Take N" labels shown by `status` (oldest is 1).
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Acquire the microphone and start the countdown.
    Record,
    /// Finish the current capture.
    Stop,
    /// Suspend the current capture.
    Pause,
    /// Continue a paused capture.
    Resume,
    /// Play a take, or the selected one.
    Play(Option<usize>),
    /// The player reached the end of the take.
    PlaybackEnded,
    /// Select a take.
    Select(usize),
    /// Delete a take, or the selected one.
    Delete(Option<usize>),
    /// Delete every take.
    DeleteAll,
    /// Open the trim editor on the selected take.
    Trim,
    /// Move the trim start handle (seconds).
    TrimStart(f64),
    /// Move the trim end handle (seconds).
    TrimEnd(f64),
    /// Restore the full trim range.
    TrimReset,
    /// Leave the trim editor without changes.
    TrimCancel,
    /// Commit the trim as a new take.
    TrimApply,
    /// Write the selected take to disk.
    Save,
    /// Print the current session state.
    Status,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Quit,
}

/// One line per command, shown by `help`.
pub(crate) const COMMAND_HELP: &[(&str, &str)] = &[
    ("record", "start the countdown and record a take"),
    ("pause / resume", "suspend or continue the recording"),
    ("stop", "finish the recording"),
    ("play [N]", "play take N (default: selected)"),
    ("ended", "mark playback as finished"),
    ("select N", "select take N"),
    ("delete [N]", "delete take N (default: selected)"),
    ("delete-all", "delete every take"),
    ("trim", "open the trim editor on the selected take"),
    ("trim-start S / trim-end S", "move a trim handle to S seconds"),
    ("trim-reset", "restore the full range"),
    ("trim-apply / trim-cancel", "commit or abandon the trim"),
    ("save", "write the selected take to disk"),
    ("status", "show the session state"),
    ("quit", "exit"),
];

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(input: &str) -> AppResult<Self> {
        let mut words = input.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(invalid(input, "empty command"));
        };
        let argument = words.next();

        if words.next().is_some() {
            return Err(invalid(input, "too many arguments"));
        }

        let command = match verb.to_ascii_lowercase().as_str() {
            "record" | "r" => no_argument(input, argument, AppCommand::Record)?,
            "stop" | "s" => no_argument(input, argument, AppCommand::Stop)?,
            "pause" => no_argument(input, argument, AppCommand::Pause)?,
            "resume" => no_argument(input, argument, AppCommand::Resume)?,
            "play" | "p" => AppCommand::Play(argument.map(|a| take_number(input, a)).transpose()?),
            "ended" => no_argument(input, argument, AppCommand::PlaybackEnded)?,
            "select" => {
                let argument = argument.ok_or_else(|| invalid(input, "expected a take number"))?;
                AppCommand::Select(take_number(input, argument)?)
            }
            "delete" => {
                AppCommand::Delete(argument.map(|a| take_number(input, a)).transpose()?)
            }
            "delete-all" => no_argument(input, argument, AppCommand::DeleteAll)?,
            "trim" => no_argument(input, argument, AppCommand::Trim)?,
            "trim-start" => AppCommand::TrimStart(seconds(input, argument)?),
            "trim-end" => AppCommand::TrimEnd(seconds(input, argument)?),
            "trim-reset" => no_argument(input, argument, AppCommand::TrimReset)?,
            "trim-cancel" => no_argument(input, argument, AppCommand::TrimCancel)?,
            "trim-apply" => no_argument(input, argument, AppCommand::TrimApply)?,
            "save" => no_argument(input, argument, AppCommand::Save)?,
            "status" => no_argument(input, argument, AppCommand::Status)?,
            "help" | "?" => no_argument(input, argument, AppCommand::Help)?,
            "quit" | "exit" | "q" => no_argument(input, argument, AppCommand::Quit)?,
            _ => return Err(invalid(input, "unknown command, try 'help'")),
        };

        Ok(command)
    }
}

#[track_caller]
fn invalid(input: &str, reason: &str) -> AppError {
    AppError::InvalidCommand {
        input: input.trim().to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn no_argument(input: &str, argument: Option<&str>, command: AppCommand) -> AppResult<AppCommand> {
    match argument {
        Some(_) => Err(invalid(input, "command takes no argument")),
        None => Ok(command),
    }
}

#[track_caller]
fn take_number(input: &str, argument: &str) -> AppResult<usize> {
    match argument.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(invalid(input, "take numbers start at 1")),
    }
}

#[track_caller]
fn seconds(input: &str, argument: Option<&str>) -> AppResult<f64> {
    let argument = argument.ok_or_else(|| invalid(input, "expected a time in seconds"))?;
    match argument.parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(secs),
        _ => Err(invalid(input, "expected a time in seconds")),
    }
}
