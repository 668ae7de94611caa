//! Simulated particles.
//!
//! A [`Particle`] wraps a [`ParticleState`] with an age, an optional
//! pre-visibility delay, vibration parameters and a variant tag:
//!
//! | Kind | Post-step behaviour |
//! |------|---------------------|
//! | [`ParticleKind::Basic`] | none |
//! | [`ParticleKind::Glow`] | flicker pulse (render only) |
//! | [`ParticleKind::Flame`] | flicker, optional splash, optional radial explode |
//! | [`ParticleKind::Firework`] | flicker, optional splash, heart-shaped explode |
//!
//! Spawned children are pushed into a caller-provided buffer; the owning act
//! appends them to its population after the whole population was stepped.
//!
//! # Example
//!
//! ```
//! use pipedream_common::{Rgba, Vec2};
//! use pipedream_kernel::particle::{Particle, ParticleState};
//!
//! let state = ParticleState::moving(Vec2::ZERO, Vec2::new(0.0, -1.0), 2.0)
//!     .with_colors(Rgba::WHITE, Rgba::WHITE.with_alpha(0.0))
//!     .with_lifetime(3);
//! let mut particle = Particle::glow(state, 5.0);
//!
//! let mut spawned = Vec::new();
//! for _ in 0..3 {
//!     particle.step(&mut spawned);
//! }
//! assert!(particle.is_dead());
//! assert_eq!(particle.state().position, Vec2::new(0.0, -6.0));
//! ```

use std::f32::consts::{PI, TAU};

use pipedream_common::{ItemId, Rect, Rgba, Vec2};

use crate::canvas::{layer, Drawable, Painter};
use crate::heart;
use crate::rng;

/// Particles at this generation or deeper never spawn children.
pub const MAX_SPAWN_GENERATION: u8 = 2;

/// Children produced by one radial explode.
pub const EXPLODE_FRAGMENTS: usize = 30;

/// Default per-tick splash probability.
pub const DEFAULT_SPLASH_CHANCE: f32 = 0.5;

/// Default flicker frequency for glowing particles (Hz).
pub const DEFAULT_FLICKER_FREQUENCY: f32 = 2.0;

/// Frame time the flicker phase assumes.
const FLICKER_DT: f32 = 0.016;

/// Spawn-time attributes of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    /// Physics position (vibration center)
    pub position: Vec2,
    /// Initial speed
    pub speed: f32,
    /// Unit heading at spawn time
    pub direction: Vec2,
    /// Velocity added to `position` every tick
    pub velocity: Vec2,
    /// Color at age 0
    pub start_color: Rgba,
    /// Color at the end of life
    pub end_color: Rgba,
    /// Diameter in pixels
    pub size: f32,
    /// Lifetime in ticks
    pub lifetime: u32,
}

impl Default for ParticleState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            speed: 0.0,
            direction: Vec2::ZERO,
            velocity: Vec2::ZERO,
            start_color: Rgba::WHITE,
            end_color: Rgba::WHITE.with_alpha(0.0),
            size: 1.0,
            lifetime: 1,
        }
    }
}

impl ParticleState {
    /// State at `position` heading along `direction` at `speed`.
    ///
    /// The direction is normalized; a zero direction leaves the particle at
    /// rest.
    #[must_use]
    pub fn moving(position: Vec2, direction: Vec2, speed: f32) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            position,
            speed,
            direction,
            velocity: direction * speed,
            ..Self::default()
        }
    }

    /// Sets the color gradient.
    #[must_use]
    pub fn with_colors(mut self, start: Rgba, end: Rgba) -> Self {
        self.start_color = start;
        self.end_color = end;
        self
    }

    /// Sets the diameter.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Sets the lifetime in ticks.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: u32) -> Self {
        self.lifetime = lifetime;
        self
    }
}

/// Oscillation around the physics position.
///
/// Produces a purely visual offset: `orthogonal_amplitude · cos(f·age + φ)`
/// along the spawn-time normal plus `parallel_amplitude · sin(f·age + φ)`
/// along the spawn-time heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibration {
    /// Amplitude across the heading
    pub orthogonal_amplitude: f32,
    /// Amplitude along the heading
    pub parallel_amplitude: f32,
    /// Angular frequency (radians per tick)
    pub frequency: f32,
    /// Initial phase
    pub phase: f32,
}

impl Vibration {
    /// No vibration, random phase.
    #[must_use]
    pub fn still() -> Self {
        Self {
            orthogonal_amplitude: 0.0,
            parallel_amplitude: 0.0,
            frequency: 0.0,
            phase: rng::angle(),
        }
    }

    /// Offset at the given age relative to a unit heading.
    #[must_use]
    pub fn offset(&self, direction: Vec2, age: u32) -> Vec2 {
        let normal = Vec2::new(direction.y, -direction.x);
        let angle = self.frequency * age as f32 + self.phase;
        normal * self.orthogonal_amplitude * angle.cos()
            + direction * self.parallel_amplitude * angle.sin()
    }
}

/// Brightness pulse of glowing particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flicker {
    /// Pulse frequency (Hz)
    pub frequency: f32,
    /// Current phase in `[0, 2π]`
    pub phase: f32,
    /// Derived pulse value in `[0, 1]`
    pub progress: f32,
}

impl Flicker {
    /// Flicker at `frequency` with a random starting phase.
    #[must_use]
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            phase: rng::uniform(0.0, TAU),
            progress: 0.0,
        }
    }

    /// Advances the phase by one frame.
    pub fn advance(&mut self) {
        self.phase += TAU * self.frequency * FLICKER_DT;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        self.progress = (self.phase.sin() + 1.0) / 2.0;
    }
}

/// Spawn capabilities of flame-like particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTraits {
    /// Emits splash children while alive
    pub splash: bool,
    /// Bursts once when its life ends
    pub explode: bool,
    /// Per-tick splash probability
    pub splash_chance: f32,
}

impl SpawnTraits {
    /// Traits with the default splash probability.
    #[must_use]
    pub fn new(splash: bool, explode: bool) -> Self {
        Self {
            splash,
            explode,
            splash_chance: DEFAULT_SPLASH_CHANCE,
        }
    }

    /// No spawning at all.
    #[must_use]
    pub fn inert() -> Self {
        Self::new(false, false)
    }
}

/// Variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Plain disc
    Basic,
    /// Flickering disc
    Glow,
    /// Flickering disc that may splash and burst radially
    Flame,
    /// Flickering disc that may splash and bursts into a heart
    Firework,
}

/// A simulated particle.
#[derive(Debug, Clone)]
pub struct Particle {
    id: ItemId,
    kind: ParticleKind,
    state: ParticleState,
    display_position: Vec2,
    age: u32,
    delay: u32,
    vibration: Vibration,
    flicker: Option<Flicker>,
    spawn: SpawnTraits,
    generation: u8,
    exploded: bool,
    layer: i32,
}

impl Particle {
    fn with_kind(state: ParticleState, kind: ParticleKind) -> Self {
        Self {
            id: ItemId::new(),
            kind,
            display_position: state.position,
            state,
            age: 0,
            delay: 0,
            vibration: Vibration::still(),
            flicker: None,
            spawn: SpawnTraits::inert(),
            generation: 0,
            exploded: false,
            layer: layer::DEFAULT,
        }
    }

    /// Plain particle.
    #[must_use]
    pub fn new(state: ParticleState) -> Self {
        Self::with_kind(state, ParticleKind::Basic)
    }

    /// Glowing particle flickering at `flicker_frequency` Hz.
    #[must_use]
    pub fn glow(state: ParticleState, flicker_frequency: f32) -> Self {
        let mut particle = Self::with_kind(state, ParticleKind::Glow);
        particle.flicker = Some(Flicker::new(flicker_frequency));
        particle
    }

    /// Flame particle.
    #[must_use]
    pub fn flame(state: ParticleState, flicker_frequency: f32, splash: bool, explode: bool) -> Self {
        let mut particle = Self::with_kind(state, ParticleKind::Flame);
        particle.flicker = Some(Flicker::new(flicker_frequency));
        particle.spawn = SpawnTraits::new(splash, explode);
        particle
    }

    /// Firework shell: splashes while rising and bursts into a heart.
    #[must_use]
    pub fn firework(state: ParticleState, flicker_frequency: f32) -> Self {
        let mut particle = Self::with_kind(state, ParticleKind::Firework);
        particle.flicker = Some(Flicker::new(flicker_frequency));
        particle.spawn = SpawnTraits::new(true, true);
        particle
    }

    /// Sets vibration amplitudes and frequency, keeping the random phase.
    #[must_use]
    pub fn with_vibration(mut self, orthogonal: f32, parallel: f32, frequency: f32) -> Self {
        self.vibration.orthogonal_amplitude = orthogonal;
        self.vibration.parallel_amplitude = parallel;
        self.vibration.frequency = frequency;
        self
    }

    /// Sets a fixed vibration phase.
    #[must_use]
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.vibration.phase = phase;
        self
    }

    /// Hides the particle (and freezes its age) for `ticks` ticks.
    #[must_use]
    pub fn with_delay(mut self, ticks: u32) -> Self {
        self.delay = ticks;
        self
    }

    /// Sets the stacking layer.
    #[must_use]
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Overrides splash and explode flags.
    #[must_use]
    pub fn with_spawn_traits(mut self, spawn: SpawnTraits) -> Self {
        self.spawn = spawn;
        self
    }

    /// Sets the per-tick splash probability.
    #[must_use]
    pub fn with_splash_chance(mut self, chance: f32) -> Self {
        self.spawn.splash_chance = chance.clamp(0.0, 1.0);
        self
    }

    fn with_generation(mut self, generation: u8) -> Self {
        self.generation = generation;
        self
    }

    /// Canvas id.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Variant tag.
    #[must_use]
    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// Spawn-time attributes (position is the live physics position).
    #[must_use]
    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    /// Age in ticks.
    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Remaining pre-visibility ticks.
    #[must_use]
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Spawn depth (0 for emitted particles).
    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// Vibration parameters.
    #[must_use]
    pub fn vibration(&self) -> &Vibration {
        &self.vibration
    }

    /// Flicker state of glowing kinds.
    #[must_use]
    pub fn flicker(&self) -> Option<&Flicker> {
        self.flicker.as_ref()
    }

    /// Where the particle was last drawn (physics position plus vibration).
    #[must_use]
    pub fn display_position(&self) -> Vec2 {
        self.display_position
    }

    /// Whether the terminal burst already fired.
    #[must_use]
    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    /// `age >= lifetime`.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.age >= self.state.lifetime
    }

    /// Hidden while the delay counts down.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.delay == 0
    }

    /// Whether this particle may splash at all.
    #[must_use]
    pub fn can_splash(&self) -> bool {
        matches!(self.kind, ParticleKind::Flame | ParticleKind::Firework)
            && self.spawn.splash
            && self.generation < MAX_SPAWN_GENERATION
    }

    /// Whether this particle bursts when its life ends.
    #[must_use]
    pub fn can_explode(&self) -> bool {
        matches!(self.kind, ParticleKind::Flame | ParticleKind::Firework)
            && self.spawn.explode
            && self.generation < MAX_SPAWN_GENERATION
    }

    /// Adds to the velocity.
    pub fn accelerate(&mut self, delta: Vec2) {
        self.state.velocity += delta;
    }

    /// Scales both vibration amplitudes.
    pub fn damp_vibration(&mut self, factor: f32) {
        self.vibration.orthogonal_amplitude *= factor;
        self.vibration.parallel_amplitude *= factor;
    }

    /// Color interpolated by age.
    #[must_use]
    pub fn color(&self) -> Rgba {
        let ratio = if self.state.lifetime == 0 {
            1.0
        } else {
            (self.age as f32 / self.state.lifetime as f32).min(1.0)
        };
        self.state.start_color.lerp(self.state.end_color, ratio)
    }

    /// Advances the particle by one tick.
    ///
    /// Children created by splash or explode are appended to `spawned`.
    pub fn step(&mut self, spawned: &mut Vec<Particle>) {
        let direction = self.state.direction.normalize_or_zero();
        self.display_position = self.state.position + self.vibration.offset(direction, self.age);

        if self.delay > 0 {
            self.delay -= 1;
        } else {
            self.age += 1;
        }
        self.state.position += self.state.velocity;

        if let Some(flicker) = self.flicker.as_mut() {
            flicker.advance();
        }

        if self.can_splash() && rng::chance(self.spawn.splash_chance) {
            spawned.push(self.splash());
        }

        if self.can_explode() && !self.exploded && self.is_dead() {
            self.exploded = true;
            match self.kind {
                ParticleKind::Firework => self.explode_heart(spawned),
                _ => self.explode_radial(spawned),
            }
        }
    }

    fn splash(&self) -> Particle {
        let state = ParticleState::moving(
            self.display_position,
            -self.state.direction,
            rng::uniform(0.0, 0.2),
        )
        .with_colors(self.state.start_color.lighter(), self.state.start_color)
        .with_size(rng::uniform_positive(0.2) * self.state.size)
        .with_lifetime(self.state.lifetime.saturating_sub(self.age).max(1));

        Particle::glow(state, 20.0)
            .with_vibration(5.0, 5.0, 0.01)
            .with_generation(self.generation + 1)
    }

    fn explode_radial(&self, spawned: &mut Vec<Particle>) {
        let radius = 20.0 + rng::uniform(0.0, 30.0);
        for _ in 0..EXPLODE_FRAGMENTS {
            let radian = rng::uniform(0.0, 2.0 * PI);
            let length = rng::uniform(0.0, radius);
            let offset = Vec2::new(radian.cos(), radian.sin()) * length;

            let state = ParticleState::moving(self.display_position + offset, offset, 0.0)
                .with_colors(self.state.end_color.darker(), self.state.end_color.lighter())
                .with_size(1.5 + rng::uniform(0.0, 1.5))
                .with_lifetime(rng::uniform_u32(5, 10));

            spawned.push(
                Particle::new(state)
                    .with_delay(rng::uniform_u32(0, 40))
                    .with_generation(self.generation + 1),
            );
        }
    }

    fn explode_heart(&self, spawned: &mut Vec<Particle>) {
        let lifetime = rng::uniform_u32(30, 40);
        let generation = self.generation + 1;

        for angle in heart::sample_angles() {
            let v = heart::velocity(angle);
            let state = ParticleState::moving(self.display_position, v, v.length())
                .with_colors(self.state.start_color.lighter(), self.state.end_color)
                .with_size(0.5 * self.state.size)
                .with_lifetime(lifetime);
            spawned.push(
                Particle::flame(state, 20.0, true, false)
                    .with_splash_chance(self.spawn.splash_chance)
                    .with_generation(generation),
            );
        }

        for angle in heart::sample_angles() {
            let v = heart::velocity(angle);
            let state = ParticleState::moving(self.display_position, v, 0.4 * v.length())
                .with_colors(self.state.start_color.lighter(), self.state.start_color)
                .with_size(0.2 * self.state.size)
                .with_lifetime(lifetime);
            spawned.push(
                Particle::flame(state, DEFAULT_FLICKER_FREQUENCY, true, true)
                    .with_splash_chance(self.spawn.splash_chance)
                    .with_generation(generation),
            );
        }
    }
}

impl Drawable for Particle {
    fn id(&self) -> ItemId {
        self.id
    }

    fn layer(&self) -> i32 {
        self.layer
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_center(self.display_position, self.state.size, self.state.size)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        if !self.is_visible() {
            return;
        }

        let color = self.color();
        let color = match self.flicker {
            Some(flicker) => color
                .lighter_by(100.0 + flicker.progress * 50.0)
                .with_alpha(color.a * (0.5 + flicker.progress * 0.5)),
            None => color,
        };
        painter.fill_ellipse(self.bounding_rect(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingPainter;
    use proptest::prelude::*;

    fn state(lifetime: u32) -> ParticleState {
        ParticleState::moving(Vec2::new(100.0, 100.0), Vec2::new(0.0, -1.0), 1.0)
            .with_colors(Rgba::from_rgb8(255, 120, 0), Rgba::from_rgba8(255, 120, 0, 0))
            .with_size(10.0)
            .with_lifetime(lifetime)
    }

    #[test]
    fn test_moving_normalizes_direction() {
        let state = ParticleState::moving(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        assert!((state.direction.length() - 1.0).abs() < 1e-6);
        assert!((state.velocity - Vec2::new(6.0, 8.0)).length() < 1e-5);
    }

    #[test]
    fn test_dies_exactly_at_lifetime() {
        let mut particle = Particle::new(state(4));
        let mut spawned = Vec::new();
        for _ in 0..3 {
            particle.step(&mut spawned);
            assert!(!particle.is_dead());
        }
        particle.step(&mut spawned);
        assert!(particle.is_dead());
        assert_eq!(particle.age(), 4);
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_delay_freezes_age_but_not_position() {
        let mut particle = Particle::new(state(10)).with_delay(3);
        let mut spawned = Vec::new();

        for tick in 1..=3 {
            particle.step(&mut spawned);
            assert_eq!(particle.age(), 0);
            assert!((particle.state().position.y - (100.0 - tick as f32)).abs() < 1e-4);
        }
        assert!(particle.is_visible());

        particle.step(&mut spawned);
        assert_eq!(particle.age(), 1);
        assert!((particle.state().position.y - 96.0).abs() < 1e-4);
    }

    #[test]
    fn test_delayed_particle_paints_nothing() {
        let particle = Particle::new(state(10)).with_delay(2);
        let mut painter = RecordingPainter::default();
        particle.paint(&mut painter);
        assert!(painter.commands.is_empty());
    }

    #[test]
    fn test_vibration_is_visual_only() {
        let mut particle = Particle::new(state(100))
            .with_vibration(50.0, 25.0, 0.3)
            .with_phase(0.0);
        let mut spawned = Vec::new();

        particle.step(&mut spawned);
        // age 0, phase 0: full orthogonal offset, no parallel offset
        let normal = Vec2::new(-1.0, 0.0);
        let expected = Vec2::new(100.0, 100.0) + normal * 50.0;
        assert!((particle.display_position() - expected).length() < 1e-3);
        assert!((particle.state().position - Vec2::new(100.0, 99.0)).length() < 1e-4);
    }

    #[test]
    fn test_glow_flicker_in_unit_range() {
        let mut particle = Particle::glow(state(50), 10.0);
        let mut spawned = Vec::new();
        for _ in 0..40 {
            particle.step(&mut spawned);
            let flicker = particle.flicker().copied().unwrap_or_else(|| Flicker::new(0.0));
            assert!((0.0..=1.0).contains(&flicker.progress));
            assert!(flicker.phase <= TAU + 1e-4);
        }
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_flame_explodes_exactly_once() {
        let mut particle = Particle::flame(state(6), 10.0, false, true);
        let mut spawned = Vec::new();

        for _ in 0..5 {
            particle.step(&mut spawned);
        }
        assert!(spawned.is_empty());

        particle.step(&mut spawned);
        assert!(particle.has_exploded());
        assert_eq!(spawned.len(), EXPLODE_FRAGMENTS);

        particle.step(&mut spawned);
        particle.step(&mut spawned);
        assert_eq!(spawned.len(), EXPLODE_FRAGMENTS);
    }

    #[test]
    fn test_explode_fragments_are_plain_and_delayed() {
        let mut particle = Particle::flame(state(1), 10.0, false, true);
        let mut spawned = Vec::new();
        particle.step(&mut spawned);

        for fragment in &spawned {
            assert_eq!(fragment.kind(), ParticleKind::Basic);
            assert!(fragment.state().speed.abs() < f32::EPSILON);
            assert!((5..10).contains(&fragment.state().lifetime));
            assert!(fragment.delay() < 40);
            assert!(fragment.state().size >= 1.5 && fragment.state().size <= 3.0);
            let distance = (fragment.state().position - particle.display_position()).length();
            assert!(distance <= 50.0 + 1e-3);
            assert!(!fragment.can_explode());
        }
    }

    #[test]
    fn test_splash_every_tick_when_certain() {
        let mut particle = Particle::flame(state(10), 10.0, true, false).with_splash_chance(1.0);
        let mut spawned = Vec::new();
        for _ in 0..4 {
            particle.step(&mut spawned);
        }
        assert_eq!(spawned.len(), 4);

        let child = &spawned[3];
        assert_eq!(child.kind(), ParticleKind::Glow);
        assert_eq!(child.generation(), 1);
        assert!(child.state().direction.y > 0.0);
        assert!(child.state().speed < 0.2);
        assert_eq!(child.state().lifetime, 6);
        assert!(child.state().size > 0.0 && child.state().size <= 2.0);
    }

    #[test]
    fn test_splash_size_positive_and_capped() {
        let mut particle = Particle::flame(state(400), 10.0, true, false).with_splash_chance(1.0);
        let parent_size = particle.state().size;
        let mut spawned = Vec::new();
        for _ in 0..300 {
            particle.step(&mut spawned);
        }

        assert!(!spawned.is_empty());
        for child in &spawned {
            let size = child.state().size;
            assert!(size > 0.0);
            assert!(size <= 0.2 * parent_size + 1e-5);
        }
    }

    #[test]
    fn test_splash_never_when_disabled() {
        let mut particle = Particle::flame(state(10), 10.0, true, false).with_splash_chance(0.0);
        let mut spawned = Vec::new();
        for _ in 0..10 {
            particle.step(&mut spawned);
        }
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_firework_heart_burst() {
        let mut shell = Particle::firework(state(3), 10.0).with_splash_chance(0.0);
        let mut spawned = Vec::new();
        for _ in 0..3 {
            shell.step(&mut spawned);
        }

        assert_eq!(spawned.len(), 2 * heart::HEART_POINTS);
        let (outer, inner) = spawned.split_at(heart::HEART_POINTS);
        for ((outer, inner), angle) in outer.iter().zip(inner).zip(heart::sample_angles()) {
            let magnitude = heart::velocity(angle).length();
            assert!((outer.state().speed - magnitude).abs() < 1e-4);
            assert!((inner.state().speed - 0.4 * magnitude).abs() < 1e-4);
            assert!((outer.state().size - 5.0).abs() < 1e-4);
            assert!((inner.state().size - 2.0).abs() < 1e-4);
            assert_eq!(outer.kind(), ParticleKind::Flame);
            assert!(!outer.can_explode());
            assert!(inner.can_explode());
            assert_eq!(outer.state().lifetime, inner.state().lifetime);
        }
    }

    #[test]
    fn test_spawn_depth_is_capped() {
        let mut shell = Particle::firework(state(1), 10.0).with_splash_chance(0.0);
        let mut first = Vec::new();
        shell.step(&mut first);

        let inner = first
            .into_iter()
            .find(Particle::can_explode)
            .map(|p| p.with_splash_chance(1.0));
        let Some(mut inner) = inner else {
            panic!("heart burst has an exploding inner layer");
        };

        let mut second = Vec::new();
        while !inner.is_dead() {
            inner.step(&mut second);
        }
        assert!(!second.is_empty());
        for child in &second {
            assert_eq!(child.generation(), 2);
            assert!(!child.can_splash());
            assert!(!child.can_explode());
        }

        // even a flame forced to spawn stops at the cap
        let capped = Particle::flame(state(1), 10.0, true, true).with_generation(MAX_SPAWN_GENERATION);
        assert!(!capped.can_splash());
        assert!(!capped.can_explode());
    }

    #[test]
    fn test_color_interpolates_with_age() {
        let mut particle = Particle::new(state(2));
        assert!((particle.color().a - 1.0).abs() < 1e-6);
        let mut spawned = Vec::new();
        particle.step(&mut spawned);
        assert!((particle.color().a - 0.5).abs() < 1e-6);
        particle.step(&mut spawned);
        assert!(particle.color().a.abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_death_tick_is_lifetime_plus_delay(lifetime in 1u32..200, delay in 0u32..50) {
            let mut particle = Particle::new(state(lifetime)).with_delay(delay);
            let mut spawned = Vec::new();
            let mut ticks = 0u32;
            while !particle.is_dead() {
                particle.step(&mut spawned);
                ticks += 1;
            }
            prop_assert_eq!(ticks, lifetime + delay);
            prop_assert_eq!(particle.age(), lifetime);
        }
    }
}
