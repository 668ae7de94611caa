//! Property tweening.
//!
//! [`TweenAnimator`] is the engine's animation collaborator: it keeps one
//! tween per item, advances them all from the tick thread and reports each
//! item finished once its duration elapsed. Finished tweens keep their end
//! pose until the owning act cancels them.

use std::time::Duration;

use ahash::AHashMap;
use pipedream_common::ItemId;
use pipedream_kernel::animation::{Animation, Animator, Pose};

#[derive(Debug, Clone, Copy)]
struct Tween {
    animation: Animation,
    elapsed: Duration,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.animation.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.animation.duration.as_secs_f32()).min(1.0)
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.animation.duration
    }
}

/// Time-based interpolation of item poses.
#[derive(Debug, Default)]
pub struct TweenAnimator {
    tweens: AHashMap<ItemId, Tween>,
}

impl TweenAnimator {
    /// Creates an idle animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked tweens, finished or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Tweens still in progress.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.tweens.values().filter(|t| !t.is_finished()).count()
    }

    /// Forgets every tween.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

impl Animator for TweenAnimator {
    fn animate(&mut self, item: ItemId, animation: Animation) {
        self.tweens.insert(
            item,
            Tween {
                animation,
                elapsed: Duration::ZERO,
            },
        );
    }

    fn pose(&self, item: ItemId) -> Option<Pose> {
        self.tweens
            .get(&item)
            .map(|tween| Pose::interpolate(&tween.animation, tween.progress()))
    }

    fn is_running(&self, item: ItemId) -> bool {
        self.tweens.get(&item).is_some_and(|tween| !tween.is_finished())
    }

    fn cancel(&mut self, item: ItemId) {
        self.tweens.remove(&item);
    }

    fn advance(&mut self, elapsed: Duration) {
        for tween in self.tweens.values_mut() {
            if !tween.is_finished() {
                tween.elapsed += elapsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedream_common::Vec2;
    use pipedream_kernel::animation::Easing;

    fn fade(ms: u64) -> Animation {
        Animation::new(Pose::at(Vec2::ZERO).with_opacity(0.0), Duration::from_millis(ms))
            .to_opacity(1.0, Easing::Linear)
    }

    #[test]
    fn test_tween_runs_until_duration() {
        let mut animator = TweenAnimator::new();
        let item = ItemId::new();
        animator.animate(item, fade(100));
        assert!(animator.is_running(item));

        animator.advance(Duration::from_millis(50));
        let pose = animator.pose(item).map(|p| p.opacity);
        assert!(pose.is_some_and(|o| (o - 0.5).abs() < 1e-4));
        assert!(animator.is_running(item));

        animator.advance(Duration::from_millis(60));
        assert!(!animator.is_running(item));
        assert!(animator.pose(item).is_some_and(|p| (p.opacity - 1.0).abs() < 1e-6));
        assert_eq!(animator.running_count(), 0);
        assert_eq!(animator.len(), 1);
    }

    #[test]
    fn test_zero_duration_finishes_at_end_pose() {
        let mut animator = TweenAnimator::new();
        let item = ItemId::new();
        animator.animate(item, fade(0));
        assert!(!animator.is_running(item));
        assert!(animator.pose(item).is_some_and(|p| (p.opacity - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_cancel_and_unknown_items() {
        let mut animator = TweenAnimator::new();
        let item = ItemId::new();
        animator.animate(item, fade(100));
        animator.cancel(item);
        assert!(animator.pose(item).is_none());
        assert!(!animator.is_running(item));
        assert!(animator.is_empty());
    }

    #[test]
    fn test_restart_replaces_tween() {
        let mut animator = TweenAnimator::new();
        let item = ItemId::new();
        animator.animate(item, fade(100));
        animator.advance(Duration::from_millis(100));
        animator.animate(item, fade(100));
        assert!(animator.is_running(item));
        assert!(animator.pose(item).is_some_and(|p| p.opacity.abs() < 1e-6));
    }
}
