//! Per-tick forces applied to particles.
//!
//! Affectors run before integration, once per particle per tick, in
//! registration order. Each one is a pure function of its own configuration
//! and the particle it is handed; the region test uses the physics position,
//! not the vibrating display position.

use pipedream_common::{Rect, Vec2};

use crate::heart;
use crate::particle::Particle;
use crate::rng;

/// Default turbulence amplitude per axis.
pub const DEFAULT_TURBULENCE: f32 = 0.1;

/// Default width of the heart repel band, in normalized heart units.
pub const DEFAULT_REPEL_RANGE: f32 = 50.0;

const GRADIENT_EPSILON: f32 = 1e-3;
const RADIAL_EPSILON: f32 = 1e-6;

/// A force field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Affector {
    /// Adds a constant vector to the velocity.
    Force {
        /// Region of effect
        region: Rect,
        /// Velocity delta per tick
        force: Vec2,
    },
    /// Adds a random vector, uniform in `[-amplitude, amplitude)` per axis.
    Turbulence {
        /// Region of effect
        region: Rect,
        /// Per-axis bound
        amplitude: f32,
    },
    /// Scales vibration amplitudes by `1 - decay_rate` per tick.
    AmplitudeDecay {
        /// Region of effect
        region: Rect,
        /// Fraction lost per tick
        decay_rate: f32,
    },
    /// Pushes particles away from a heart-shaped boundary.
    HeartRepel {
        /// Region of effect
        region: Rect,
        /// Heart center in scene coordinates
        center: Vec2,
        /// Pixels per heart unit
        scale: f32,
        /// Maximum push per tick
        strength: f32,
        /// Width of the influence band
        range: f32,
    },
}

impl Affector {
    /// Constant force inside `region`.
    #[must_use]
    pub fn force(region: Rect, force: Vec2) -> Self {
        Self::Force { region, force }
    }

    /// Default turbulence inside `region`.
    #[must_use]
    pub fn turbulence(region: Rect) -> Self {
        Self::Turbulence {
            region,
            amplitude: DEFAULT_TURBULENCE,
        }
    }

    /// Vibration decay inside `region`.
    #[must_use]
    pub fn amplitude_decay(region: Rect, decay_rate: f32) -> Self {
        Self::AmplitudeDecay { region, decay_rate }
    }

    /// Heart repel with the default range.
    #[must_use]
    pub fn heart_repel(region: Rect, center: Vec2, scale: f32, strength: f32) -> Self {
        Self::HeartRepel {
            region,
            center,
            scale,
            strength,
            range: DEFAULT_REPEL_RANGE,
        }
    }

    /// Region of effect.
    #[must_use]
    pub fn region(&self) -> Rect {
        match *self {
            Self::Force { region, .. }
            | Self::Turbulence { region, .. }
            | Self::AmplitudeDecay { region, .. }
            | Self::HeartRepel { region, .. } => region,
        }
    }

    /// Applies the affector to one particle.
    pub fn affect(&self, particle: &mut Particle) {
        let position = particle.state().position;
        if !self.region().contains(position) {
            return;
        }

        match *self {
            Self::Force { force, .. } => particle.accelerate(force),
            Self::Turbulence { amplitude, .. } => {
                let jitter = Vec2::new(
                    rng::uniform(-amplitude, amplitude),
                    rng::uniform(-amplitude, amplitude),
                );
                particle.accelerate(jitter);
            }
            Self::AmplitudeDecay { decay_rate, .. } => {
                particle.damp_vibration(1.0 - decay_rate);
            }
            Self::HeartRepel {
                center,
                scale,
                strength,
                range,
                ..
            } => {
                let distance = heart_distance(position, center, scale);
                let push = repel_strength(distance, range);
                if push > 0.0 {
                    let gradient = heart_gradient(position, center, scale);
                    particle.accelerate(gradient * distance.signum() * push * strength);
                }
            }
        }
    }
}

/// Normalized signed distance of `point` to the heart boundary.
///
/// `point` is mapped into heart units as `(point - center) / scale`; the
/// implicit value is divided by the squared radius so it stays comparable
/// far from the center.
#[must_use]
pub fn heart_distance(point: Vec2, center: Vec2, scale: f32) -> f32 {
    let p = (point - center) / scale;
    heart::implicit(p.x, p.y) / (p.x * p.x + p.y * p.y + RADIAL_EPSILON)
}

/// Repulsion factor for a signed distance: 1 on the curve, 0 at `range`.
#[must_use]
pub fn repel_strength(distance: f32, range: f32) -> f32 {
    let distance = distance.abs();
    if distance < range {
        (range - distance) / range
    } else {
        0.0
    }
}

/// Direction of steepest increase of the heart distance at `point`.
///
/// Central differences, normalized by the manhattan length.
#[must_use]
pub fn heart_gradient(point: Vec2, center: Vec2, scale: f32) -> Vec2 {
    let dx = Vec2::new(GRADIENT_EPSILON, 0.0);
    let dy = Vec2::new(0.0, GRADIENT_EPSILON);
    let gradient = Vec2::new(
        heart_distance(point + dx, center, scale) - heart_distance(point - dx, center, scale),
        heart_distance(point + dy, center, scale) - heart_distance(point - dy, center, scale),
    );
    gradient / (gradient.x.abs() + gradient.y.abs() + RADIAL_EPSILON)
}
