//! Media front end.
//!
//! The [`Theatre`] sits between the player and the [`Sequencer`]: it turns
//! playback positions into clock ticks, shows a replay control when the
//! soundtrack ends and restarts the show when that control is clicked.

use pipedream_common::{AssetId, ItemId, PipedreamError, PipedreamResult, SchedulerError, Vec2};
use pipedream_kernel::canvas::{layer, PixmapItem};
use tracing::{debug, info, warn};

use crate::clock::PlaybackClock;
use crate::media::{MediaEvent, MediaStatus};
use crate::sequencer::Sequencer;

/// Image of the replay control.
pub const REPLAY_ASSET: &str = "replay";

/// Side of the replay control.
pub const REPLAY_SIZE: f32 = 64.0;

/// Center of the replay control.
pub const REPLAY_POSITION: Vec2 = Vec2::new(50.0, 50.0);

/// Player-facing side of the show.
#[derive(Debug)]
pub struct Theatre {
    sequencer: Sequencer,
    clock: PlaybackClock,
    replay: Option<ItemId>,
}

impl Theatre {
    /// Wraps a sequencer.
    #[must_use]
    pub fn new(sequencer: Sequencer) -> Self {
        Self {
            sequencer,
            clock: PlaybackClock::new(),
            replay: None,
        }
    }

    /// The driven sequencer.
    #[must_use]
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Mutable access to the driven sequencer.
    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Starts the show. The caller starts the media afterwards.
    ///
    /// # Errors
    ///
    /// Propagates [`Sequencer::start`] errors.
    pub fn start(&mut self) -> PipedreamResult<()> {
        self.sequencer.start()?;
        self.clock.reset();
        Ok(())
    }

    /// Dispatches a player notification.
    pub fn handle(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PositionChanged(ms) => self.on_position_changed(ms),
            MediaEvent::StatusChanged(status) => self.on_media_status_changed(status),
        }
    }

    /// Forwards whole seconds to the sequencer.
    pub fn on_position_changed(&mut self, position_ms: u64) {
        if let Some(seconds) = self.clock.observe_position_ms(position_ms) {
            debug!(seconds, "Clock");
            self.sequencer.set_current_timestamp(seconds);
        }
    }

    /// Reacts to player status changes.
    pub fn on_media_status_changed(&mut self, status: MediaStatus) {
        match status {
            MediaStatus::EndOfMedia => {
                self.clock.reset();
                self.show_replay();
            }
            MediaStatus::Invalid => warn!("Media is invalid"),
            MediaStatus::Loaded | MediaStatus::Buffered => debug!(?status, "Media status"),
        }
    }

    /// Whether the replay control is on stage.
    #[must_use]
    pub fn replay_visible(&self) -> bool {
        self.replay.is_some()
    }

    /// Handles a click in scene coordinates.
    ///
    /// Returns whether the show restarted; the caller then restarts the media.
    ///
    /// # Errors
    ///
    /// Propagates [`Sequencer::start`] errors other than "already running".
    pub fn on_click(&mut self, point: Vec2) -> PipedreamResult<bool> {
        let hit = self.sequencer.stage().lock().overlay_at(point);
        match (hit, self.replay) {
            (Some(hit), Some(replay)) if hit == replay => self.on_replay_clicked(),
            _ => Ok(false),
        }
    }

    /// Removes the replay control and restarts the show.
    ///
    /// # Errors
    ///
    /// Propagates [`Sequencer::start`] errors other than "already running".
    pub fn on_replay_clicked(&mut self) -> PipedreamResult<bool> {
        if let Some(id) = self.replay.take() {
            self.sequencer.stage().lock().remove_overlay(id);
        }
        match self.start() {
            Ok(()) => {
                info!("Replay");
                Ok(true)
            }
            Err(PipedreamError::Scheduler(SchedulerError::AlreadyRunning)) => {
                info!("Replay ignored, the show is still running");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Stops the show.
    ///
    /// # Errors
    ///
    /// Returns [`PipedreamError::Thread`] if a worker panicked.
    pub fn shutdown(&mut self) -> PipedreamResult<()> {
        self.replay = None;
        self.sequencer.shutdown()
    }

    fn show_replay(&mut self) {
        if self.replay.is_some() {
            return;
        }
        let button = PixmapItem::new(
            AssetId::new(REPLAY_ASSET),
            Vec2::splat(REPLAY_SIZE),
            REPLAY_POSITION,
            layer::OVERLAY,
        );
        let id = self.sequencer.stage().lock().add_overlay(button);
        info!("Replay control shown");
        self.replay = Some(id);
    }
}
