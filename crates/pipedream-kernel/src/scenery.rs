//! Falling petal scene.
//!
//! No physics: each petal is a pixmap whose fall, spin and fade are handed
//! to the [`Animator`] collaborator. The act only spawns petals, mirrors the
//! animator's pose into its items and drops items the animator finished.

use std::time::Duration;

use pipedream_common::{AssetId, ItemId, Rect, Vec2};
use tracing::trace;

use crate::act::{Curtain, SceneContext};
use crate::animation::{Animation, Animator, Easing, Pose};
use crate::canvas::{layer, Drawable, Painter, PixmapItem};
use crate::rng;

/// Sheet the petal tiles are cut from.
pub const PETAL_SHEET: &str = "petals";

/// Tiles on the petal sheet (3 rows of 4).
pub const PETAL_TILES: u32 = 12;

/// Edge of one petal tile.
pub const PETAL_SIZE: f32 = 50.0;

/// A petal is spawned every this many ticks.
const SPAWN_PERIOD: u32 = 3;

/// A pixmap riding an animation.
#[derive(Debug, Clone)]
pub struct FallingItem {
    pixmap: PixmapItem,
}

impl FallingItem {
    /// Creates a falling item at `start`.
    #[must_use]
    pub fn new(asset: AssetId, start: Vec2) -> Self {
        Self {
            pixmap: PixmapItem::new(asset, Vec2::splat(PETAL_SIZE), start, layer::DEFAULT),
        }
    }

    /// Canvas id.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.pixmap.id
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pixmap.pose
    }

    fn sync(&mut self, animator: &dyn Animator) {
        if let Some(pose) = animator.pose(self.pixmap.id) {
            self.pixmap.pose = pose;
        }
    }
}

impl Drawable for FallingItem {
    fn id(&self) -> ItemId {
        self.pixmap.id
    }

    fn layer(&self) -> i32 {
        self.pixmap.layer
    }

    fn bounding_rect(&self) -> Rect {
        self.pixmap.bounding_rect()
    }

    fn paint(&self, painter: &mut dyn Painter) {
        self.pixmap.paint(painter);
    }
}

/// Falling petals.
#[derive(Debug)]
pub struct EnframedScenery {
    curtain: Curtain,
    petals: Vec<AssetId>,
    items: Vec<FallingItem>,
    counter: u32,
}

impl Default for EnframedScenery {
    fn default() -> Self {
        Self::new()
    }
}

impl EnframedScenery {
    /// Scene using the 12 petal tiles.
    #[must_use]
    pub fn new() -> Self {
        let petals = (0..PETAL_TILES)
            .map(|tile| AssetId::tile(PETAL_SHEET, tile))
            .collect();
        Self::with_assets(petals)
    }

    /// Scene drawing from a custom asset set.
    #[must_use]
    pub fn with_assets(petals: Vec<AssetId>) -> Self {
        Self {
            curtain: Curtain::new(),
            petals,
            items: Vec::new(),
            counter: 0,
        }
    }

    /// Lifecycle flags.
    #[must_use]
    pub fn curtain(&self) -> &Curtain {
        &self.curtain
    }

    /// Live petals.
    #[must_use]
    pub fn items(&self) -> &[FallingItem] {
        &self.items
    }

    /// Number of live petals.
    #[must_use]
    pub fn population(&self) -> usize {
        self.items.len()
    }

    /// Idle -> Showing.
    pub fn start(&mut self) {
        self.curtain.start();
    }

    /// Stops spawning; exits once every petal landed.
    pub fn should_stop(&mut self) {
        self.curtain.request_stop();
    }

    /// Runs one tick.
    pub fn act_out(&mut self, ctx: &mut SceneContext<'_>) {
        if !self.curtain.is_showing() {
            return;
        }

        if !self.curtain.is_stopping() {
            self.counter += 1;
            if self.counter >= SPAWN_PERIOD {
                self.counter = 0;
                self.spawn(ctx);
            }
        }

        let animator = &mut *ctx.animator;
        let canvas = &mut *ctx.canvas;
        self.items.retain_mut(|item| {
            item.sync(&*animator);
            if animator.is_running(item.id()) {
                true
            } else {
                animator.cancel(item.id());
                canvas.remove_item(item.id());
                false
            }
        });

        self.curtain.exit_if_drained(self.items.len());
    }

    fn spawn(&mut self, ctx: &mut SceneContext<'_>) {
        if self.petals.is_empty() {
            return;
        }
        let asset = self.petals[fastrand::usize(..self.petals.len())].clone();

        let start = Vec2::new(rng::uniform(0.0, ctx.bounds.width), -PETAL_SIZE);
        let end = Vec2::new(
            start.x + rng::uniform(-200.0, 200.0),
            ctx.bounds.height + PETAL_SIZE,
        );
        let duration = Duration::from_millis(u64::from(rng::uniform_u32(3000, 5000)));

        let animation = Animation::new(Pose::at(start), duration)
            .to_position(end, Easing::InQuad)
            .to_rotation(360.0 + rng::uniform(0.0, 360.0), Easing::Linear)
            .to_opacity(0.0, Easing::Linear);

        let item = FallingItem::new(asset, start);
        trace!(item = item.id().raw(), ?duration, "Petal spawned");
        ctx.canvas.add_item(item.id(), item.layer());
        ctx.animator.animate(item.id(), animation);
        self.items.push(item);
    }

    /// Live petals as drawables.
    #[must_use]
    pub fn drawables(&self) -> Vec<&dyn Drawable> {
        self.items.iter().map(|i| i as &dyn Drawable).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::tests_support::SteppedAnimator;

    fn stage() -> Rect {
        Rect::new(0.0, 0.0, 1440.0, 900.0)
    }

    fn tick(scene: &mut EnframedScenery, canvas: &mut RecordingCanvas, animator: &mut SteppedAnimator) {
        let mut ctx = SceneContext::new(stage(), canvas, animator);
        scene.act_out(&mut ctx);
    }

    #[test]
    fn test_spawns_every_third_tick() {
        let mut scene = EnframedScenery::new();
        scene.start();
        let mut canvas = RecordingCanvas::new();
        let mut animator = SteppedAnimator::default();

        for _ in 0..9 {
            tick(&mut scene, &mut canvas, &mut animator);
        }
        assert_eq!(scene.population(), 3);
        assert_eq!(canvas.item_count(), 3);
        assert_eq!(animator.running.len(), 3);
    }

    #[test]
    fn test_petal_animation_shape() {
        let mut scene = EnframedScenery::new();
        scene.start();
        let mut canvas = RecordingCanvas::new();
        let mut animator = SteppedAnimator::default();
        for _ in 0..3 {
            tick(&mut scene, &mut canvas, &mut animator);
        }

        let id = scene.items()[0].id();
        let Some((animation, _)) = animator.running.get(&id) else {
            panic!("petal was not animated");
        };
        assert!(animation.duration >= Duration::from_millis(3000));
        assert!(animation.duration < Duration::from_millis(5000));
        assert!((animation.start.position.y + 50.0).abs() < f32::EPSILON);
        assert!((animation.end.position.y - 950.0).abs() < f32::EPSILON);
        assert_eq!(animation.position_easing, Easing::InQuad);
        assert!(animation.end.rotation >= 360.0);
        assert!(animation.end.opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_finished_petals_leave_and_act_exits() {
        let mut scene = EnframedScenery::new();
        scene.start();
        let mut canvas = RecordingCanvas::new();
        let mut animator = SteppedAnimator::default();
        for _ in 0..6 {
            tick(&mut scene, &mut canvas, &mut animator);
        }
        assert_eq!(scene.population(), 2);

        scene.should_stop();
        tick(&mut scene, &mut canvas, &mut animator);
        assert_eq!(scene.population(), 2);
        assert!(!scene.curtain().has_exited());

        animator.advance(Duration::from_secs(6));
        tick(&mut scene, &mut canvas, &mut animator);
        assert_eq!(scene.population(), 0);
        assert_eq!(canvas.item_count(), 0);
        assert!(animator.running.is_empty());
        assert!(scene.curtain().has_exited());
    }
}
