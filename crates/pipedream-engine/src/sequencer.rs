//! Show sequencer.
//!
//! Two worker threads share the [`Stage`](crate::stage::Stage):
//!
//! - the tick thread advances the stage at a fixed interval for as long as
//!   the sequencer lives;
//! - the timeline thread is spawned by every [`Sequencer::start`]. It loads
//!   the background, asks the [`Script`] for a fresh timeline and then
//!   waits on the clock channel, firing every cue whose timestamp has been
//!   reached. It ends when the timeline is exhausted, when it is
//!   interrupted or when the clock goes away.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use pipedream_common::{AssetId, PipedreamError, PipedreamResult, SchedulerError};
use tracing::{debug, info, trace, warn};

use crate::stage::SharedStage;
use crate::timeline::Timeline;

/// Message on the clock channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    /// The soundtrack reached this many whole seconds
    Position(u32),
    /// Stop the timeline thread
    Interrupt,
}

/// Fills a fresh timeline on every start.
pub trait Script: Send + Sync {
    /// Adds the show's cues.
    fn populate(&self, timeline: &mut Timeline);
}

impl<F> Script for F
where
    F: Fn(&mut Timeline) + Send + Sync,
{
    fn populate(&self, timeline: &mut Timeline) {
        self(timeline);
    }
}

/// Drives a [`Stage`](crate::stage::Stage) from a timeline and a clock.
pub struct Sequencer {
    stage: SharedStage,
    script: Arc<dyn Script>,
    tick_interval: Duration,
    background: Option<AssetId>,
    clock: Option<Sender<ClockSignal>>,
    current: Arc<AtomicU32>,
    ticking: Arc<AtomicBool>,
    tick_thread: Option<JoinHandle<()>>,
    timeline_thread: Option<JoinHandle<()>>,
    shut_down: bool,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("tick_interval", &self.tick_interval)
            .field("background", &self.background)
            .field("current", &self.current_timestamp())
            .field("running", &self.is_running())
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl Sequencer {
    /// Creates an idle sequencer. No thread runs until [`Self::start`].
    pub fn new(stage: SharedStage, script: impl Script + 'static, tick_interval: Duration) -> Self {
        Self {
            stage,
            script: Arc::new(script),
            tick_interval,
            background: None,
            clock: None,
            current: Arc::new(AtomicU32::new(0)),
            ticking: Arc::new(AtomicBool::new(false)),
            tick_thread: None,
            timeline_thread: None,
            shut_down: false,
        }
    }

    /// Background loaded (transparent) at every start.
    #[must_use]
    pub fn with_background(mut self, asset: AssetId) -> Self {
        self.background = Some(asset);
        self
    }

    /// The shared stage.
    #[must_use]
    pub fn stage(&self) -> &SharedStage {
        &self.stage
    }

    /// Last timestamp reported by the clock.
    #[must_use]
    pub fn current_timestamp(&self) -> u32 {
        self.current.load(Ordering::Acquire)
    }

    /// Whether a timeline thread is still firing cues.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timeline_thread
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts (or restarts) the show from timestamp 0.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::AlreadyRunning`] while a timeline is active,
    /// [`SchedulerError::ShutDown`] after [`Self::shutdown`], and thread
    /// errors if a worker could not be spawned.
    pub fn start(&mut self) -> PipedreamResult<()> {
        if self.shut_down {
            return Err(SchedulerError::ShutDown.into());
        }
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning.into());
        }
        self.join_timeline()?;
        self.ensure_ticking()?;

        // A fresh channel per run drops any signal aimed at the previous one.
        let (tx, rx) = unbounded();
        self.clock = Some(tx);
        self.current.store(0, Ordering::Release);

        let stage = Arc::clone(&self.stage);
        let script = Arc::clone(&self.script);
        let background = self.background.clone();
        let handle = thread::Builder::new()
            .name("pipedream-timeline".into())
            .spawn(move || run_timeline(&stage, script.as_ref(), background, &rx))?;
        self.timeline_thread = Some(handle);

        info!("Sequencer started");
        Ok(())
    }

    /// Reports the soundtrack position in whole seconds.
    /// Values not greater than the last one are ignored.
    pub fn set_current_timestamp(&self, timestamp: u32) {
        let previous = self.current.fetch_max(timestamp, Ordering::AcqRel);
        if timestamp <= previous {
            trace!(timestamp, previous, "Stale clock value ignored");
            return;
        }
        if let Some(clock) = &self.clock {
            if clock.send(ClockSignal::Position(timestamp)).is_err() {
                trace!(timestamp, "No timeline listening");
            }
        }
    }

    /// Blocks until the current timeline thread ends.
    ///
    /// # Errors
    ///
    /// Returns [`PipedreamError::Thread`] if the thread panicked.
    pub fn join_timeline(&mut self) -> PipedreamResult<()> {
        match self.timeline_thread.take() {
            Some(handle) => join_worker(handle, "timeline"),
            None => Ok(()),
        }
    }

    /// Interrupts the timeline, stops ticking and clears the stage.
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PipedreamError::Thread`] if a worker panicked.
    pub fn shutdown(&mut self) -> PipedreamResult<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;

        if let Some(clock) = self.clock.take() {
            // The receiver is gone if the timeline already ended.
            let _ = clock.send(ClockSignal::Interrupt);
        }
        let timeline = self.join_timeline();

        self.ticking.store(false, Ordering::Release);
        let ticker = match self.tick_thread.take() {
            Some(handle) => join_worker(handle, "tick"),
            None => Ok(()),
        };

        self.stage.lock().clear();
        info!("Sequencer shut down");
        timeline.and(ticker)
    }

    fn ensure_ticking(&mut self) -> PipedreamResult<()> {
        if self.tick_thread.is_some() {
            return Ok(());
        }
        self.ticking.store(true, Ordering::Release);

        let stage = Arc::clone(&self.stage);
        let ticking = Arc::clone(&self.ticking);
        let interval = self.tick_interval;
        let handle = thread::Builder::new()
            .name("pipedream-tick".into())
            .spawn(move || {
                debug!(?interval, "Tick thread running");
                while ticking.load(Ordering::Acquire) {
                    let frame_start = Instant::now();
                    stage.lock().tick();
                    let elapsed = frame_start.elapsed();
                    if elapsed < interval {
                        thread::sleep(interval - elapsed);
                    }
                }
                debug!("Tick thread stopped");
            })?;
        self.tick_thread = Some(handle);
        Ok(())
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Sequencer shutdown failed: {e}");
        }
    }
}

fn join_worker(handle: JoinHandle<()>, name: &str) -> PipedreamResult<()> {
    handle
        .join()
        .map_err(|_| PipedreamError::Thread(format!("{name} thread panicked")))
}

fn run_timeline(
    stage: &SharedStage,
    script: &dyn Script,
    background: Option<AssetId>,
    clock: &Receiver<ClockSignal>,
) {
    if let Some(asset) = background {
        stage.lock().reload_background(asset);
    }

    let mut timeline = Timeline::new();
    script.populate(&mut timeline);
    info!(cues = timeline.len(), "Timeline populated");

    let mut now = 0;
    fire_due(&mut timeline, now, stage);

    while !timeline.is_empty() {
        match clock.recv() {
            Ok(ClockSignal::Position(timestamp)) => {
                if timestamp > now {
                    now = timestamp;
                    fire_due(&mut timeline, now, stage);
                }
            }
            Ok(ClockSignal::Interrupt) => {
                info!(now, pending = timeline.len(), "Timeline interrupted");
                return;
            }
            Err(_) => {
                warn!(now, "{}", SchedulerError::ClockDisconnected);
                return;
            }
        }
    }
    info!(now, "Timeline finished");
}

fn fire_due(timeline: &mut Timeline, now: u32, stage: &SharedStage) {
    while let Some(event) = timeline.pop_due(now) {
        info!(timestamp = event.timestamp, cue = event.label, now, "Cue");
        event.fire(stage);
    }
}
