//! Heart curve helpers.
//!
//! The same curve shows up twice: as the parametric template the firework
//! burst follows, and as the implicit boundary the heart repel affector
//! pushes particles away from.

use std::f32::consts::TAU;

use pipedream_common::Vec2;

/// Number of points on one firework heart layer.
pub const HEART_POINTS: usize = 30;

/// Scale applied to the parametric heart (pixels per tick at full speed).
pub const HEART_VELOCITY_SCALE: f32 = 0.5;

/// Implicit heart function `(x²+y²−1)³ − x²y³`.
///
/// Zero on the curve, negative inside, positive outside.
#[must_use]
pub fn implicit(x: f32, y: f32) -> f32 {
    let x2 = x * x;
    let y2 = y * y;
    let t = x2 + y2 - 1.0;
    t * t * t - x2 * y2 * y
}

/// Parametric heart velocity at `angle`.
///
/// `y` is negated so the heart stands upright in screen space.
#[must_use]
pub fn velocity(angle: f32) -> Vec2 {
    let x = 16.0 * angle.sin().powi(3);
    let y = 13.0 * angle.cos()
        - 5.0 * (2.0 * angle).cos()
        - 2.0 * (3.0 * angle).cos()
        - (4.0 * angle).cos();
    Vec2::new(x, -y) * HEART_VELOCITY_SCALE
}

/// Evenly spaced sample angles for one layer of the burst.
pub fn sample_angles() -> impl Iterator<Item = f32> {
    (0..HEART_POINTS).map(|i| i as f32 * TAU / HEART_POINTS as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_zero_on_axes_crossings() {
        assert!(implicit(0.0, 1.0).abs() < 1e-6);
        assert!(implicit(0.0, -1.0).abs() < 1e-6);
        assert!(implicit(1.0, 0.0).abs() < 1e-6);
        assert!(implicit(-1.0, 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_implicit_sign() {
        assert!(implicit(0.0, 0.0) < 0.0);
        assert!(implicit(3.0, 3.0) > 0.0);
    }

    #[test]
    fn test_velocity_top_of_heart() {
        // angle 0: x = 0, y = 13 - 5 - 2 - 1 = 5
        let v = velocity(0.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y + 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_velocity_never_zero_on_samples() {
        for angle in sample_angles() {
            assert!(velocity(angle).length() > 0.1);
        }
        assert_eq!(sample_angles().count(), HEART_POINTS);
    }
}
