/// Default countdown before capture starts, in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// Lead-in counter ticked once per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// Starts counting down from `secs`.
    pub fn new(secs: u32) -> Self {
        Self { remaining: secs }
    }

    /// Counts one second; returns `true` once zero is reached.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_elapsed()
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the countdown has finished.
    pub fn is_elapsed(&self) -> bool {
        self.remaining == 0
    }
}
