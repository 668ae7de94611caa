//! Particle emitters.
//!
//! An [`Emitter`] samples fresh [`ParticleState`]s from its configured ranges
//! and turns them into particles through a factory closure, which decides the
//! variant (glow, firework, vibration settings, ...).
//!
//! Cadence per tick:
//! 1. while the initial delay counts down, nothing is produced;
//! 2. while the interval counter is below the interval, nothing is produced;
//! 3. otherwise the counter resets and exactly `quantity` particles appear.

use std::ops::Range;

use pipedream_common::{Rect, Rgba, Vec2};

use crate::particle::{Particle, ParticleState};
use crate::rng;

/// Builds a particle from a sampled state.
pub type ParticleFactory = Box<dyn Fn(ParticleState) -> Particle + Send>;

/// Sampled color gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    /// Start color
    pub start: Rgba,
    /// End color
    pub end: Rgba,
}

/// Emission cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmittingParams {
    /// Ticks before the first batch
    pub delay: u32,
    /// Particles per batch
    pub quantity: u32,
    /// Idle ticks between batches
    pub interval: u32,
}

impl Default for EmittingParams {
    fn default() -> Self {
        Self {
            delay: 0,
            quantity: 1,
            interval: 0,
        }
    }
}

/// Spawns particles into an act.
pub struct Emitter {
    factory: ParticleFactory,
    bounds: Rect,
    direction: Vec2,
    speed: Range<f32>,
    color: Option<ColorRange>,
    size: Range<f32>,
    lifetime: Range<u32>,
    params: EmittingParams,
    delay_remaining: u32,
    interval_counter: u32,
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("bounds", &self.bounds)
            .field("direction", &self.direction)
            .field("speed", &self.speed)
            .field("color", &self.color)
            .field("size", &self.size)
            .field("lifetime", &self.lifetime)
            .field("params", &self.params)
            .field("delay_remaining", &self.delay_remaining)
            .field("interval_counter", &self.interval_counter)
            .finish_non_exhaustive()
    }
}

impl Emitter {
    /// Creates an emitter spawning anywhere inside `bounds`.
    #[must_use]
    pub fn new(bounds: Rect, factory: impl Fn(ParticleState) -> Particle + Send + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            bounds,
            direction: Vec2::ZERO,
            speed: 0.0..1.0,
            color: None,
            size: 1.0..2.0,
            lifetime: 5..10,
            params: EmittingParams::default(),
            delay_remaining: 0,
            interval_counter: 0,
        }
    }

    /// Emitter producing plain particles.
    #[must_use]
    pub fn basic(bounds: Rect) -> Self {
        Self::new(bounds, Particle::new)
    }

    /// Sets the cadence. Quantity is at least one.
    #[must_use]
    pub fn with_emitting_params(mut self, delay: u32, quantity: u32, interval: u32) -> Self {
        self.params = EmittingParams {
            delay,
            quantity: quantity.max(1),
            interval,
        };
        self.delay_remaining = delay;
        self.interval_counter = 0;
        self
    }

    /// Restricts spawn positions to `[x_min, x_max) x [y_min, y_max)`.
    #[must_use]
    pub fn with_point_range(mut self, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        self.bounds = Rect::new(x_min, y_min, x_max - x_min, y_max - y_min);
        self
    }

    /// Sets the heading and the speed range.
    #[must_use]
    pub fn with_velocity(mut self, direction: Vec2, min_speed: f32, max_speed: f32) -> Self {
        self.direction = direction;
        self.speed = min_speed..max_speed;
        self
    }

    /// Sets an explicit color gradient.
    #[must_use]
    pub fn with_color(mut self, start: Rgba, end: Rgba) -> Self {
        self.color = Some(ColorRange { start, end });
        self
    }

    /// Sets the diameter range.
    #[must_use]
    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.size = min..max;
        self
    }

    /// Sets the lifetime range in ticks.
    #[must_use]
    pub fn with_lifetime_range(mut self, min: u32, max: u32) -> Self {
        self.lifetime = min..max;
        self
    }

    /// Current cadence.
    #[must_use]
    pub fn emitting_params(&self) -> EmittingParams {
        self.params
    }

    /// Spawn box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Samples one particle state.
    #[must_use]
    pub fn generate_state(&self) -> ParticleState {
        let position = Vec2::new(
            rng::uniform(self.bounds.left(), self.bounds.right()),
            rng::uniform(self.bounds.top(), self.bounds.bottom()),
        );
        let speed = rng::uniform(self.speed.start, self.speed.end);

        let (start, end) = match self.color {
            Some(range) => (range.start, range.end),
            None => random_hue_gradient(),
        };

        ParticleState::moving(position, self.direction, speed)
            .with_colors(start, end)
            .with_size(rng::uniform(self.size.start, self.size.end))
            .with_lifetime(rng::uniform_u32(self.lifetime.start, self.lifetime.end))
    }

    /// Runs one tick of the cadence, appending new particles to `out`.
    ///
    /// Returns how many particles were produced.
    pub fn emit_into(&mut self, out: &mut Vec<Particle>) -> usize {
        if self.delay_remaining > 0 {
            self.delay_remaining -= 1;
            return 0;
        }
        if self.interval_counter < self.params.interval {
            self.interval_counter += 1;
            return 0;
        }
        self.interval_counter = 0;

        let quantity = self.params.quantity as usize;
        out.reserve(quantity);
        for _ in 0..quantity {
            out.push((self.factory)(self.generate_state()));
        }
        quantity
    }
}

/// Random hue, fading from a dim opaque tone to a transparent one.
fn random_hue_gradient() -> (Rgba, Rgba) {
    let hue = rng::uniform(0.0, 360.0);
    let saturation = f32::from(rng::uniform_u8(0, 100)) / 255.0;
    let lightness = f32::from(rng::uniform_u8(0, 100)) / 255.0;
    let start = Rgba::from_hsla(hue, 100.0 / 255.0, 100.0 / 255.0, 1.0);
    let end = Rgba::from_hsla(hue, saturation, lightness, 0.0);
    (start, end)
}
