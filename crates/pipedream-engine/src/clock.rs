//! Playback clock.
//!
//! Media reports positions in milliseconds, many times per second. The show
//! only cares about whole seconds, and only when they move forward.

/// Converts playback positions to strictly increasing whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackClock {
    last: Option<u32>,
}

impl PlaybackClock {
    /// A clock that has seen nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a position; returns the second to forward, if it is new.
    pub fn observe_position_ms(&mut self, position_ms: u64) -> Option<u32> {
        let seconds = u32::try_from(position_ms / 1000).unwrap_or(u32::MAX);
        match self.last {
            Some(last) if seconds <= last => None,
            _ => {
                self.last = Some(seconds);
                Some(seconds)
            }
        }
    }

    /// Last forwarded second.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.last
    }

    /// Starts over (end of media, replay).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
