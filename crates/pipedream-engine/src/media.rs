//! Media source.
//!
//! The show follows a soundtrack. [`SimulatedPlayback`] stands in for a real
//! player: a worker thread reports load status, then the playback position
//! at a fixed wall-clock interval scaled by the playback rate, then the end
//! of media.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use pipedream_common::{PipedreamError, PipedreamResult};
use tracing::{debug, info, warn};

/// Default wall-clock time between two position reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(100);

/// Player status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStatus {
    /// Media loaded
    Loaded,
    /// Enough data buffered to play
    Buffered,
    /// Playback reached the end
    EndOfMedia,
    /// Media cannot be played
    Invalid,
}

/// Notification from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// Position in milliseconds
    PositionChanged(u64),
    /// Status change
    StatusChanged(MediaStatus),
}

/// A soundtrack of fixed length played by a timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedPlayback {
    length: Duration,
    rate: f32,
    report_interval: Duration,
}

impl SimulatedPlayback {
    /// A track of `length_secs` seconds played at `rate` times real time.
    #[must_use]
    pub fn new(length_secs: u32, rate: f32) -> Self {
        Self {
            length: Duration::from_secs(u64::from(length_secs)),
            rate,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    /// Changes how often the position is reported.
    #[must_use]
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Track length.
    #[must_use]
    pub fn length(&self) -> Duration {
        self.length
    }

    /// Starts playing, reporting to `events`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the player thread could not be spawned.
    pub fn play(&self, events: Sender<MediaEvent>) -> PipedreamResult<Playback> {
        let stop = Arc::new(AtomicBool::new(false));
        let track = *self;
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("pipedream-media".into())
            .spawn(move || track.run(&events, &flag))?;
        info!(length = ?self.length, rate = self.rate, "Playback started");
        Ok(Playback {
            stop,
            handle: Some(handle),
        })
    }

    fn run(self, events: &Sender<MediaEvent>, stop: &AtomicBool) {
        let send = |event| events.send(event).is_ok();

        if !(self.rate.is_finite() && self.rate > 0.0) || self.length.is_zero() {
            warn!(rate = self.rate, "Media cannot be played");
            send(MediaEvent::StatusChanged(MediaStatus::Invalid));
            return;
        }
        if !send(MediaEvent::StatusChanged(MediaStatus::Loaded))
            || !send(MediaEvent::StatusChanged(MediaStatus::Buffered))
        {
            return;
        }

        let length_ms = self.length.as_millis() as f64;
        let step_ms = self.report_interval.as_secs_f64() * 1000.0 * f64::from(self.rate);
        let mut position_ms = 0.0_f64;

        loop {
            if stop.load(Ordering::Acquire) {
                debug!(position_ms, "Playback stopped");
                return;
            }
            let reported = position_ms.min(length_ms) as u64;
            if !send(MediaEvent::PositionChanged(reported)) {
                return;
            }
            if position_ms >= length_ms {
                break;
            }
            thread::sleep(self.report_interval);
            position_ms += step_ms;
        }

        info!("End of media");
        send(MediaEvent::StatusChanged(MediaStatus::EndOfMedia));
    }
}

/// Handle to a running playback. Dropping it stops the player.
#[derive(Debug)]
pub struct Playback {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Playback {
    /// Asks the player to stop at its next report.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Whether the player thread ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the player thread.
    ///
    /// # Errors
    ///
    /// Returns [`PipedreamError::Thread`] if the thread panicked.
    pub fn join(&mut self) -> PipedreamResult<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PipedreamError::Thread("media thread panicked".into())),
            None => Ok(()),
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
        if let Err(e) = self.join() {
            warn!("{e}");
        }
    }
}
