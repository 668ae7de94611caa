//! Animation collaborator interface.
//!
//! Decorative items (falling petals, the background fade) are not simulated
//! by the kernel. Acts describe the start and end [`Pose`] of an item and
//! hand the description to an [`Animator`], then read the interpolated pose
//! back every tick until the animator reports the item finished.

use std::time::Duration;

use pipedream_common::{ItemId, Vec2};

/// Easing curve for one animated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Quadratic ease in (slow start).
    InQuad,
    /// Quadratic ease out (slow end).
    OutQuad,
    /// Quadratic ease in and out.
    InOutQuad,
}

impl Easing {
    /// Maps normalized time to normalized progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Animatable properties of a scene item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in scene coordinates
    pub position: Vec2,
    /// Rotation in degrees (clockwise)
    pub rotation: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl Pose {
    /// Pose at a position, unrotated and opaque.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same pose with a different opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Interpolates each channel with its own easing.
    #[must_use]
    pub fn interpolate(animation: &Animation, t: f32) -> Self {
        let (start, end) = (animation.start, animation.end);
        let p = animation.position_easing.apply(t);
        let r = animation.rotation_easing.apply(t);
        let o = animation.opacity_easing.apply(t);
        Self {
            position: start.position.lerp(end.position, p),
            rotation: start.rotation + (end.rotation - start.rotation) * r,
            opacity: start.opacity + (end.opacity - start.opacity) * o,
        }
    }
}

/// Description of a property animation.
///
/// Channels whose start and end values are equal stay put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// Total duration
    pub duration: Duration,
    /// Pose at `t = 0`
    pub start: Pose,
    /// Pose at `t = duration`
    pub end: Pose,
    /// Easing of the position channel
    pub position_easing: Easing,
    /// Easing of the rotation channel
    pub rotation_easing: Easing,
    /// Easing of the opacity channel
    pub opacity_easing: Easing,
}

impl Animation {
    /// Creates an animation that holds `start` for `duration`.
    #[must_use]
    pub fn new(start: Pose, duration: Duration) -> Self {
        Self {
            duration,
            start,
            end: start,
            position_easing: Easing::Linear,
            rotation_easing: Easing::Linear,
            opacity_easing: Easing::Linear,
        }
    }

    /// Animates the position towards `target`.
    #[must_use]
    pub fn to_position(mut self, target: Vec2, easing: Easing) -> Self {
        self.end.position = target;
        self.position_easing = easing;
        self
    }

    /// Animates the rotation towards `degrees`.
    #[must_use]
    pub fn to_rotation(mut self, degrees: f32, easing: Easing) -> Self {
        self.end.rotation = degrees;
        self.rotation_easing = easing;
        self
    }

    /// Animates the opacity towards `opacity`.
    #[must_use]
    pub fn to_opacity(mut self, opacity: f32, easing: Easing) -> Self {
        self.end.opacity = opacity;
        self.opacity_easing = easing;
        self
    }
}

/// Runs property animations on behalf of the acts.
pub trait Animator: Send {
    /// Starts (or restarts) an animation for `item`.
    fn animate(&mut self, item: ItemId, animation: Animation);

    /// Current interpolated pose, `None` if the item was never animated or
    /// has been cancelled.
    fn pose(&self, item: ItemId) -> Option<Pose>;

    /// Whether the item's animation is still in progress.
    fn is_running(&self, item: ItemId) -> bool;

    /// Forgets the item.
    fn cancel(&mut self, item: ItemId);

    /// Advances every running animation.
    fn advance(&mut self, elapsed: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_only_touches_requested_channels() {
        let start = Pose::at(Vec2::new(10.0, -50.0));
        let anim = Animation::new(start, Duration::from_millis(3000))
            .to_opacity(0.0, Easing::Linear);

        assert_eq!(anim.end.position, start.position);
        assert!((anim.end.rotation - start.rotation).abs() < f32::EPSILON);
        assert!(anim.end.opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::InQuad, Easing::OutQuad, Easing::InOutQuad] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            assert!((easing.apply(2.0) - 1.0).abs() < 1e-6);
        }
        assert!(Easing::InQuad.apply(0.5) < 0.5);
        assert!(Easing::OutQuad.apply(0.5) > 0.5);
        assert!((Easing::InOutQuad.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_interpolate_channels_independently() {
        let anim = Animation::new(Pose::at(Vec2::ZERO), Duration::from_secs(1))
            .to_position(Vec2::new(100.0, 0.0), Easing::InQuad)
            .to_rotation(360.0, Easing::Linear)
            .to_opacity(0.0, Easing::Linear);

        let half = Pose::interpolate(&anim, 0.5);
        assert!((half.position.x - 25.0).abs() < 1e-4);
        assert!((half.rotation - 180.0).abs() < 1e-4);
        assert!((half.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_default_pose_is_opaque() {
        assert!((Pose::default().opacity - 1.0).abs() < f32::EPSILON);
    }
}
