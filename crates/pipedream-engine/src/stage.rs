//! The shared scene.
//!
//! A [`Stage`] owns the act queue, the background image, overlay controls
//! and the two collaborators. The tick thread and the timeline thread both
//! reach it through a [`SharedStage`] mutex, so a cue never interleaves with
//! a half-applied tick.
//!
//! Only the front act of the queue is advanced; once it exits it is dropped
//! and the next queued act takes over on the following tick.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use pipedream_common::{AssetId, ItemId, Rect, Rgba, Vec2};
use pipedream_kernel::act::{Act, ActState, SceneContext};
use pipedream_kernel::animation::{Animation, Animator, Easing};
use pipedream_kernel::canvas::{layer, Canvas, Drawable, PixmapItem};
use tracing::{debug, info};

/// Stage handle shared by the sequencer threads.
pub type SharedStage = Arc<Mutex<Stage>>;

/// Scene graph plus collaborators.
pub struct Stage {
    bounds: Rect,
    acts: VecDeque<Act>,
    canvas: Box<dyn Canvas>,
    animator: Box<dyn Animator>,
    background: Option<PixmapItem>,
    background_gray: u8,
    overlays: Vec<PixmapItem>,
    tick_interval: Duration,
    ticks: u64,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("bounds", &self.bounds)
            .field("acts", &self.acts.len())
            .field("background", &self.background.as_ref().map(|b| b.id))
            .field("background_gray", &self.background_gray)
            .field("overlays", &self.overlays.len())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Creates an empty stage with a white backdrop.
    pub fn new(
        bounds: Rect,
        canvas: Box<dyn Canvas>,
        animator: Box<dyn Animator>,
        tick_interval: Duration,
    ) -> Self {
        let mut stage = Self {
            bounds,
            acts: VecDeque::new(),
            canvas,
            animator,
            background: None,
            background_gray: u8::MAX,
            overlays: Vec::new(),
            tick_interval,
            ticks: 0,
        };
        stage.canvas.set_background(Rgba::gray(u8::MAX));
        stage
    }

    /// Wraps the stage for sharing between threads.
    #[must_use]
    pub fn into_shared(self) -> SharedStage {
        Arc::new(Mutex::new(self))
    }

    /// Stage bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Ticks run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Queued acts, the front one included.
    #[must_use]
    pub fn act_count(&self) -> usize {
        self.acts.len()
    }

    /// Name and state of the front act.
    #[must_use]
    pub fn front_act(&self) -> Option<(&str, ActState)> {
        self.acts.front().map(|act| (act.name(), act.state()))
    }

    /// Live particles and items across the queue.
    #[must_use]
    pub fn population(&self) -> usize {
        self.acts.iter().map(Act::population).sum()
    }

    /// Current background item.
    #[must_use]
    pub fn background(&self) -> Option<&PixmapItem> {
        self.background.as_ref()
    }

    /// Current backdrop gray level.
    #[must_use]
    pub fn background_gray(&self) -> u8 {
        self.background_gray
    }

    /// Starts `act` and queues it behind the current one.
    pub fn push_act(&mut self, act: impl Into<Act>) {
        let mut act = act.into();
        act.start();
        info!(act = act.name(), queued = self.acts.len(), "Act queued");
        self.acts.push_back(act);
    }

    /// Asks the front act to wind down.
    pub fn end_current_scene(&mut self) {
        if let Some(act) = self.acts.front_mut() {
            info!(act = act.name(), "Ending current scene");
            act.should_stop();
        }
    }

    /// Replaces the background with a fresh, fully transparent image and
    /// ends the current scene.
    pub fn reload_background(&mut self, asset: AssetId) {
        if let Some(old) = self.background.take() {
            self.animator.cancel(old.id);
            self.canvas.remove_item(old.id);
        }
        self.end_current_scene();

        let mut item = PixmapItem::new(
            asset,
            Vec2::new(self.bounds.width, self.bounds.height),
            self.bounds.center(),
            layer::BACKGROUND,
        );
        item.pose.opacity = 0.0;
        self.canvas.add_item(item.id, item.layer);
        debug!(item = item.id.raw(), "Background loaded");
        self.background = Some(item);
    }

    /// Animates the background opacity.
    pub fn fade_background(&mut self, from: f32, to: f32, duration: Duration) {
        if let Some(background) = &self.background {
            let start = background.pose.with_opacity(from);
            self.animator.animate(
                background.id,
                Animation::new(start, duration).to_opacity(to, Easing::Linear),
            );
            debug!(from, to, ?duration, "Background fade");
        }
    }

    /// Sets the backdrop to a gray level.
    pub fn set_background_gray(&mut self, gray: u8) {
        self.background_gray = gray;
        self.canvas.set_background(Rgba::gray(gray));
    }

    /// Adds an overlay control.
    pub fn add_overlay(&mut self, item: PixmapItem) -> ItemId {
        let id = item.id;
        self.canvas.add_item(id, item.layer);
        self.overlays.push(item);
        id
    }

    /// Removes an overlay control.
    pub fn remove_overlay(&mut self, id: ItemId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|item| item.id != id);
        let removed = self.overlays.len() != before;
        if removed {
            self.canvas.remove_item(id);
        }
        removed
    }

    /// Overlay controls on stage.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Topmost overlay under `point`.
    #[must_use]
    pub fn overlay_at(&self, point: Vec2) -> Option<ItemId> {
        self.overlays
            .iter()
            .rev()
            .find(|item| item.hit(point))
            .map(|item| item.id)
    }

    /// Advances animations and the front act, then presents a frame.
    pub fn tick(&mut self) {
        self.ticks += 1;
        self.animator.advance(self.tick_interval);

        if let Some(background) = &mut self.background {
            if let Some(pose) = self.animator.pose(background.id) {
                background.pose = pose;
            }
        }

        if let Some(front) = self.acts.front_mut() {
            if front.is_showing() {
                let mut ctx = SceneContext::new(self.bounds, self.canvas.as_mut(), self.animator.as_mut());
                front.act_out(&mut ctx);
            }
            if front.has_exited() {
                if let Some(done) = self.acts.pop_front() {
                    info!(act = done.name(), remaining = self.acts.len(), "Next act");
                }
            }
        }

        self.present();
    }

    fn present(&mut self) {
        let mut items: Vec<&dyn Drawable> = Vec::new();
        if let Some(background) = &self.background {
            items.push(background);
        }
        for act in &self.acts {
            items.extend(act.drawables());
        }
        items.extend(self.overlays.iter().map(|o| o as &dyn Drawable));
        self.canvas.present(&items);
    }

    /// Drops every act, overlay and the background.
    pub fn clear(&mut self) {
        for act in self.acts.drain(..) {
            for item in act.drawables() {
                self.animator.cancel(item.id());
                self.canvas.remove_item(item.id());
            }
        }
        for overlay in self.overlays.drain(..) {
            self.canvas.remove_item(overlay.id);
        }
        if let Some(background) = self.background.take() {
            self.animator.cancel(background.id);
            self.canvas.remove_item(background.id);
        }
        info!("Stage cleared");
    }
}

/// Sweeps the backdrop gray level from `start` to `end`, one level per step.
///
/// Blocks the calling thread for the whole sweep; the stage lock is taken
/// per step so ticks keep running in between.
pub fn sweep_background_gray(stage: &SharedStage, start: u8, end: u8, step: Duration) {
    let total = i32::from(start.abs_diff(end));
    if total == 0 {
        stage.lock().set_background_gray(start);
        return;
    }

    let (from, to) = (i32::from(start), i32::from(end));
    for i in 0..=total {
        let gray = from + (to - from) * i / total;
        stage.lock().set_background_gray(gray.clamp(0, 255) as u8);
        if !step.is_zero() {
            thread::sleep(step);
        }
    }
    debug!(start, end, "Gray sweep finished");
}
